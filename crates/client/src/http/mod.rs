//! Session-aware HTTP pipeline: request building, transport, and response
//! normalization.
//!
//! # Architecture
//!
//! - One shared `reqwest::Client` with a cookie store - authentication is
//!   session-cookie based, no bearer tokens
//! - Every response is normalized into [`Envelope`] or a typed DTO at this
//!   boundary; feature services never inspect raw status codes
//! - A 401 anywhere fires a single unauthorized hook, consumed by the
//!   session layer - no per-call-site special-casing
//! - Multipart uploads stream through a byte-counting body so callers can
//!   observe progress; the callback is a no-op for everything else

mod transport;
mod upload;

pub use transport::ApiClient;
pub use upload::{ProgressCallback, UploadFile};

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// The uniform shape every backend reply is normalized into.
///
/// Backend handlers answer `{ success, message?, data? }`; non-JSON 2xx
/// bodies are wrapped via [`Envelope::from_text`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Wrap a raw non-JSON success body.
    #[must_use]
    pub const fn from_text(text: String) -> Self {
        Self {
            success: true,
            message: Some(text),
            data: None,
        }
    }

    /// Unwrap the payload, turning a `success: false` reply into an error
    /// carrying the server's message verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the reply is unsuccessful or
    /// carries no payload.
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            return Err(ApiError::Validation(
                self.message
                    .unwrap_or_else(|| "request failed".to_string()),
            ));
        }

        self.data.ok_or_else(|| {
            ApiError::Validation(
                self.message
                    .unwrap_or_else(|| "no data in response".to_string()),
            )
        })
    }
}
