//! Paginated result list for one search surface.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{ImageId, RemoteImage};
use crate::domain::errors::SearchError;
use crate::domain::ports::{ImageSearchPort, SearchQuery};

/// Accumulates pages of results for the current query.
///
/// A failed or cancelled request leaves the current query and results as
/// they were.
pub struct ResultFeed {
    search: Arc<dyn ImageSearchPort>,
    page_size: u32,
    query: String,
    results: Vec<Arc<RemoteImage>>,
    seen: HashSet<ImageId>,
}

impl ResultFeed {
    /// Creates an empty feed requesting `page_size` results per page.
    #[must_use]
    pub fn new(search: Arc<dyn ImageSearchPort>, page_size: u32) -> Self {
        Self {
            search,
            page_size,
            query: String::new(),
            results: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Returns the query the current results belong to.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the accumulated results in display order.
    #[must_use]
    pub fn results(&self) -> &[Arc<RemoteImage>] {
        &self.results
    }

    /// Returns the number of accumulated results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if there are no results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Replaces the results with the first page for `text`.
    ///
    /// An empty `text` clears the feed without issuing a request.
    ///
    /// # Errors
    /// Returns the search error; existing results are kept.
    pub async fn search(&mut self, text: &str) -> Result<usize, SearchError> {
        if text.is_empty() {
            self.clear();
            return Ok(0);
        }

        let query = SearchQuery::new(text, 0, self.page_size)?;
        let page = self.fetch(&query).await?;

        self.clear();
        self.query = text.to_string();
        let added = self.append(page);

        debug!(query = %self.query, results = added, "Replaced search results");
        Ok(added)
    }

    /// Appends the next page for the current query.
    ///
    /// The offset is the number of results already held. Results whose
    /// identifier is already present are skipped.
    ///
    /// # Errors
    /// Returns the search error; existing results are kept.
    pub async fn load_more(&mut self) -> Result<usize, SearchError> {
        if self.query.is_empty() {
            return Ok(0);
        }

        let offset = u32::try_from(self.results.len()).unwrap_or(u32::MAX);
        let query = SearchQuery::new(self.query.clone(), offset, self.page_size)?;
        let page = self.fetch(&query).await?;
        let added = self.append(page);

        debug!(query = %self.query, offset, added, "Loaded more results");
        Ok(added)
    }

    /// Drops the query and all results.
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.seen.clear();
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<RemoteImage>, SearchError> {
        self.search.search(query).await.map_err(|e| {
            if e.is_cancelled() {
                debug!(query = %query.text(), "Search superseded");
            } else {
                warn!(query = %query.text(), error = %e, "Search failed");
            }
            e
        })
    }

    fn append(&mut self, page: Vec<RemoteImage>) -> usize {
        let before = self.results.len();
        for image in page {
            if self.seen.insert(image.id().clone()) {
                self.results.push(Arc::new(image));
            }
        }
        self.results.len() - before
    }
}
