//! Unified error types for webmention discovery and sending.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Boxed transport error, kept intact so callers can downcast it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error types for the webmention client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A URL argument failed syntactic validation. Raised before any I/O.
    #[error("INVALID_ARGUMENT: {name} is not an absolute URL: {value:?}")]
    InvalidArgument { name: &'static str, value: String },

    /// Timeout, connection reset, DNS failure and the like.
    #[error("NETWORK_FAILURE: {0}")]
    Network(#[source] BoxError),

    /// The webmention endpoint answered with a 4xx or 5xx status.
    #[error("HTTP_STATUS: {status}")]
    HttpStatus { status: u16, body: String },

    /// Redirect bound exhausted while re-posting to `Location` targets.
    #[error("TOO_MANY_REDIRECTS: {endpoint} (limit {limit})")]
    TooManyRedirects { endpoint: String, limit: usize },

    /// The HTTP client could not be built.
    #[error("CLIENT_ERROR: {0}")]
    Client(String),
}

impl Error {
    pub fn invalid_argument(name: &'static str, value: impl Into<String>) -> Self {
        Error::InvalidArgument { name, value: value.into() }
    }

    pub fn network(err: impl Into<BoxError>) -> Self {
        Error::Network(err.into())
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidArgument { .. } => -32602,
            Error::Network(_) => -32006,
            Error::HttpStatus { .. } => -32008,
            Error::TooManyRedirects { .. } => -32009,
            Error::Client(_) => -32000,
        };

        let data = match &err {
            Error::HttpStatus { status, body } => Some(serde_json::json!({ "status": status, "body": body })),
            _ => None,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data }
    }
}
