//! Giphy search HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use url::Url;

use super::dto::{GifObject, SearchResponse};
use super::query::{GIPHY_SEARCH_ENDPOINT, search_url};
use crate::domain::entities::RemoteImage;
use crate::domain::errors::SearchError;
use crate::domain::ports::{ImageSearchPort, SearchQuery};
use crate::infrastructure::config::GiphyConfig;
use crate::infrastructure::http::{self, FetchError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bookkeeping for the single outstanding search.
#[derive(Default)]
struct InFlightSearch {
    generation: u64,
    cancel: Option<oneshot::Sender<()>>,
}

/// Giphy search client. Keeps at most one search outstanding.
pub struct GiphySearchClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    in_flight: Mutex<InFlightSearch>,
}

impl std::fmt::Debug for GiphySearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GiphySearchClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl GiphySearchClient {
    /// Creates a client against the public Giphy endpoint.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(api_key: impl Into<String>) -> Result<Self, SearchError> {
        Self::with_endpoint(GIPHY_SEARCH_ENDPOINT, api_key, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom endpoint and request timeout.
    ///
    /// # Errors
    /// Returns error if the endpoint is not a valid URL or HTTP client creation fails.
    pub fn with_endpoint(
        endpoint: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            SearchError::invalid_request(format!("invalid search endpoint {endpoint:?}: {e}"))
        })?;

        let client = http::build_client(timeout)
            .map_err(|e| SearchError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            in_flight: Mutex::new(InFlightSearch::default()),
        })
    }

    /// Creates a client from the `[giphy]` configuration section.
    ///
    /// # Errors
    /// Returns error if no API key is configured or the client cannot be built.
    pub fn from_config(config: &GiphyConfig) -> Result<Self, SearchError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SearchError::invalid_request("no Giphy API key configured"))?;

        Self::with_endpoint(
            &config.endpoint,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Searches for GIFs, cancelling any search still running on this client.
    ///
    /// # Errors
    /// Returns [`SearchError::Cancelled`] if a newer search was started before
    /// this one finished, or the transport, status or decode failure otherwise.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<RemoteImage>, SearchError> {
        let url = search_url(&self.endpoint, &self.api_key, query);
        let (generation, cancelled) = self.begin_search();

        debug!(
            query = %query.text(),
            offset = query.offset(),
            limit = query.limit(),
            "Searching Giphy"
        );

        let outcome = tokio::select! {
            biased;
            _ = cancelled => Err(SearchError::Cancelled),
            result = self.fetch(url) => result,
        };

        self.finish_search(generation, outcome)
    }

    /// Registers a new search, signalling the previous one to stop.
    fn begin_search(&self) -> (u64, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let mut in_flight = self.in_flight.lock();

        if let Some(previous) = in_flight.cancel.replace(tx) {
            let _ = previous.send(());
            debug!("Cancelled previous search");
        }

        in_flight.generation += 1;
        (in_flight.generation, rx)
    }

    /// Discards the outcome of a search that was superseded, even if its
    /// response already arrived.
    fn finish_search(
        &self,
        generation: u64,
        outcome: Result<Vec<RemoteImage>, SearchError>,
    ) -> Result<Vec<RemoteImage>, SearchError> {
        let mut in_flight = self.in_flight.lock();

        if in_flight.generation != generation {
            debug!(generation, "Discarding superseded search results");
            return Err(SearchError::Cancelled);
        }

        in_flight.cancel = None;
        outcome
    }

    async fn fetch(&self, url: Url) -> Result<Vec<RemoteImage>, SearchError> {
        let body = http::get_bytes(&self.client, url).await.map_err(|e| {
            warn!(error = %e, "Giphy search request failed");
            match e {
                FetchError::Status(status) => SearchError::Status {
                    status: status.as_u16(),
                },
                FetchError::Transport(e) if e.is_timeout() => {
                    SearchError::network("request timed out")
                }
                FetchError::Transport(e) => SearchError::network(e.to_string()),
            }
        })?;

        let response: SearchResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Bad JSON in Giphy response");
            SearchError::decode(e.to_string())
        })?;

        Ok(parse_results(response))
    }
}

/// Converts every well-formed entry, dropping and logging the rest.
fn parse_results(response: SearchResponse) -> Vec<RemoteImage> {
    let total = response.data.len();

    let results: Vec<RemoteImage> = response
        .data
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            match serde_json::from_value::<GifObject>(value)
                .map_err(Into::into)
                .and_then(RemoteImage::try_from)
            {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!(index, error = %e, "Failed to parse search result");
                    None
                }
            }
        })
        .collect();

    debug!(total, parsed = results.len(), "Parsed search results");
    results
}

#[async_trait]
impl ImageSearchPort for GiphySearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RemoteImage>, SearchError> {
        Self::search(self, query).await
    }
}
