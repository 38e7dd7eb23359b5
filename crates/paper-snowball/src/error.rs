//! Error types for the paper search client.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// Message shown for connectivity failures.
pub const CONNECT_MESSAGE: &str =
    "Cannot connect to server. Please check if the server is running.";

/// Message carried by envelope decode failures.
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid response format from server";

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Backend unreachable (connection refused, DNS, TLS handshake).
    #[error("Cannot connect to server. Please check if the server is running.")]
    Connect(String),

    /// Other HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(anyhow::Error),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Body was JSON but not one of the accepted envelopes.
    #[error("Invalid response format from server: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend answered with an explicit error status in the body.
    #[error("{0}")]
    Remote(String),
}

impl ClientError {
    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Create an invalid format error.
    #[must_use]
    pub fn invalid_format(detail: impl Into<String>) -> Self {
        Self::InvalidFormat(detail.into())
    }

    /// Returns true if the backend could not be reached at all.
    #[must_use]
    pub const fn is_connect(&self) -> bool {
        matches!(self, Self::Connect(_))
    }

    /// Returns true for 5xx responses.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Classify a transport error from reqwest.
    #[must_use]
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Http(err)
        }
    }

    /// Classify an error from the middleware stack.
    #[must_use]
    pub fn from_middleware(err: reqwest_middleware::Error, timeout: Duration) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => Self::from_transport(e, timeout),
            reqwest_middleware::Error::Middleware(e) => Self::Middleware(e),
        }
    }
}

/// The user-facing operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Paper search.
    Search,
    /// Title suggestions.
    Suggestions,
    /// Reference download.
    References,
}

impl Operation {
    /// Verb phrase used in failure messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Search => "search papers",
            Self::Suggestions => "fetch suggestions",
            Self::References => "fetch references",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// Errors surfaced by user-triggered operations.
#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    /// Local precondition failed; no request was issued.
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// The request was issued and failed.
    #[error("Failed to {operation}: {source}")]
    Client {
        /// Operation that failed
        operation: Operation,
        /// Underlying client error
        #[source]
        source: ClientError,
    },
}

impl RequestError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Attach an operation to a client error.
    #[must_use]
    pub const fn client(operation: Operation, source: ClientError) -> Self {
        Self::Client { operation, source }
    }

    /// Returns true if the request never left the process.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Convert to the message shown to the user.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Client { source: ClientError::Connect(_), .. } => CONNECT_MESSAGE.to_string(),
            Self::Client { operation, source: ClientError::Server { status, message } } => {
                let detail = if message.trim().is_empty() {
                    "Unknown server error"
                } else {
                    message.as_str()
                };
                format!("Server error ({status}) occurred while trying to {operation}: {detail}")
            }
            Self::Client { operation, source } => format!("Failed to {operation}: {source}"),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for user-triggered operations.
pub type RequestResult<T> = Result<T, RequestError>;
