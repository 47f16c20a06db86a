//! Search error types.

use thiserror::Error;

/// Errors that fail a whole search request.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum SearchError {
    #[error("invalid search request: {reason}")]
    InvalidRequest { reason: String },

    #[error("network error during search: {message}")]
    Network { message: String },

    #[error("search endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to decode search response: {message}")]
    Decode { message: String },

    #[error("search was superseded by a newer request")]
    Cancelled,
}

impl SearchError {
    /// Creates invalid request error.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns whether the search was cancelled by a newer one.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }
}
