//! Shared HTTP plumbing for search requests and original downloads.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

const USER_AGENT: &str = concat!("gifstash/", env!("CARGO_PKG_VERSION"));

/// Errors from a single GET round trip.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("HTTP {}: {}", .0.as_u16(), .0.canonical_reason().unwrap_or("Unknown"))]
    Status(StatusCode),
}

impl FetchError {
    /// Returns the HTTP status for status errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Transport(_) => None,
        }
    }
}

/// Builds the HTTP client used by the search client and the original cache.
///
/// # Errors
/// Returns error if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Issues a GET and returns the full body of a 2xx response.
///
/// # Errors
/// Returns error on transport failure or a non-success status.
pub async fn get_bytes(client: &Client, url: Url) -> Result<Bytes, FetchError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    Ok(response.bytes().await?)
}

/// Returns a copy of `base` whose query string is exactly `pairs`,
/// form-urlencoded in order.
#[must_use]
pub fn with_query<'a>(base: &Url, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query_replaces_existing_pairs() {
        let base = Url::parse("https://example.com/search?stale=1").unwrap();
        let url = with_query(&base, [("a", "1"), ("b", "two words")]);

        assert_eq!(url.query(), Some("a=1&b=two+words"));
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_get_bytes_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing.gif")
            .with_status(404)
            .create_async()
            .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/missing.gif", server.url())).unwrap();
        let err = get_bytes(&client, url).await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        mock.assert_async().await;
    }
}
