//! Unified error taxonomy for the client.
//!
//! Every backend interaction resolves to a single [`ApiError`], classified
//! once at the transport boundary. Feature services never inspect raw status
//! codes; callers match on variants to decide what to render.

use thiserror::Error;

/// Application-level error type for the Printastic client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure: DNS, refused connection, broken transfer.
    #[error("connection problem, please check your network")]
    Connection(#[source] reqwest::Error),

    /// The request exceeded its time ceiling.
    #[error("the request timed out, please try again")]
    Timeout,

    /// The session cookie is missing or no longer valid (HTTP 401).
    #[error("session expired, please log in again")]
    SessionExpired,

    /// The session is valid but the role is not allowed (HTTP 403).
    #[error("access denied")]
    AccessDenied,

    /// Resource not found (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The request body exceeded the server's size limit (HTTP 413).
    #[error("file too large")]
    PayloadTooLarge,

    /// A 4xx the server explained; the message passes through verbatim.
    #[error("{0}")]
    Validation(String),

    /// Server-side failure (5xx). Internal details are never exposed.
    #[error("server error, please try again later")]
    Server(u16),

    /// A 2xx body that could not be decoded into the expected shape.
    #[error("unexpected response from server")]
    Parse(#[from] serde_json::Error),

    /// An operation that requires a session was attempted while anonymous.
    #[error("you must be logged in to do this")]
    NotAuthenticated,

    /// The supplied base URL or endpoint path is malformed.
    #[error("invalid endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl ApiError {
    /// Classify a transport-level `reqwest` failure.
    ///
    /// Timeouts are distinct from connection failures; everything else at
    /// this layer is a connection problem.
    #[must_use]
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Connection(err)
        }
    }

    /// Whether this error means the session should be considered gone.
    #[must_use]
    pub const fn invalidates_session(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

/// Result type alias for [`ApiError`].
pub type Result<T> = std::result::Result<T, ApiError>;
