//! Error types for talking to the content API.
//!
//! Every remote call collapses into a single [`ApiError`]: the homepage
//! treats all of them the same way (log and fall back), while the admin
//! commands surface them to the user.  Form validation failures are kept
//! separate in [`ValidationError`] because they never reach the network.

use thiserror::Error;

/// A failed request against the content API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request to '{endpoint}' failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("'{endpoint}' returned HTTP {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    /// The body could not be decoded into the expected shape.
    #[error("could not decode response from '{endpoint}': {message}")]
    Decode { endpoint: String, message: String },

    /// The configured base URL cannot be joined with the endpoint path.
    #[error("invalid API URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    /// The endpoint the failing request targeted, when known.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Network { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(endpoint),
            Self::InvalidUrl(_) => None,
        }
    }
}

/// A form payload was rejected before submission.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {form}: {}", .problems.join(", "))]
pub struct ValidationError {
    /// Which form failed ("slide", "devotional", ...).
    pub form: &'static str,
    /// One human-readable line per offending field.
    pub problems: Vec<String>,
}
