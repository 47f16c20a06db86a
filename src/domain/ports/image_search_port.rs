//! Image search port definition.

use async_trait::async_trait;

use crate::domain::entities::RemoteImage;
use crate::domain::errors::SearchError;

/// A single page request against the search provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    offset: u32,
    limit: u32,
}

impl SearchQuery {
    /// Creates a query for `limit` results starting at `offset`.
    ///
    /// # Errors
    /// Returns error if `limit` is zero.
    pub fn new(text: impl Into<String>, offset: u32, limit: u32) -> Result<Self, SearchError> {
        if limit == 0 {
            return Err(SearchError::invalid_request("limit must be positive"));
        }

        Ok(Self {
            text: text.into(),
            offset,
            limit,
        })
    }

    /// Returns the search text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the result offset.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Returns the maximum number of results.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

/// Port for remote image search.
///
/// Implementations keep at most one search outstanding: starting a new one
/// resolves the previous call with [`SearchError::Cancelled`].
#[async_trait]
pub trait ImageSearchPort: Send + Sync {
    /// Runs a search and returns results in provider order.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RemoteImage>, SearchError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;

    use parking_lot::Mutex;

    /// Mock search port replaying scripted responses.
    #[derive(Default)]
    pub struct MockImageSearch {
        responses: Mutex<VecDeque<Result<Vec<RemoteImage>, SearchError>>>,
        queries: Mutex<Vec<SearchQuery>>,
    }

    impl MockImageSearch {
        /// Creates a mock with no scripted responses.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a response for the next search call.
        pub fn push_response(&self, response: Result<Vec<RemoteImage>, SearchError>) {
            self.responses.lock().push_back(response);
        }

        /// Returns every query received so far.
        pub fn queries(&self) -> Vec<SearchQuery> {
            self.queries.lock().clone()
        }
    }

    #[async_trait]
    impl ImageSearchPort for MockImageSearch {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<RemoteImage>, SearchError> {
            self.queries.lock().push(query.clone());
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}
