//! The transport: executes requests and classifies responses.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::upload::{ProgressCallback, UploadFile, progress_part};
use crate::http::Envelope;

/// Hook fired once per 401 response, consumed by the session layer.
pub(crate) type UnauthorizedHook = Box<dyn Fn() + Send + Sync>;

/// Client for the Printastic REST backend.
///
/// Cheaply cloneable; all clones share one cookie store, so a login through
/// any clone authenticates every subsequent request.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    upload_timeout: Duration,
    unauthorized_hook: RwLock<Option<UnauthorizedHook>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built or the
    /// base URL cannot be normalized.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        // Url::join treats a base without a trailing slash as a file,
        // dropping its last path segment.
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                upload_timeout: config.upload_timeout,
                unauthorized_hook: RwLock::new(None),
            }),
        })
    }

    /// Register the hook fired whenever a 401 is classified.
    ///
    /// Intended to be set exactly once, by the session layer.
    pub fn set_unauthorized_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        if let Ok(mut slot) = self.inner.unauthorized_hook.write() {
            *slot = Some(Box::new(hook));
        }
    }

    /// Issue a GET request and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply cannot be decoded.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::GET, path, None::<&()>).await
    }

    /// Issue a POST request with a JSON body and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply cannot be decoded.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::POST, path, Some(body)).await
    }

    /// Issue a PUT request with a JSON body and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply cannot be decoded.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::PUT, path, Some(body)).await
    }

    /// Issue a bodyless POST request, tolerating non-JSON success bodies.
    ///
    /// Used for fire-and-forget endpoints like logout, where some handlers
    /// answer plain text. A body that does parse as an envelope keeps its
    /// meaning: a 200 carrying `success: false` is still a failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply reports failure.
    pub async fn post_empty(&self, path: &str) -> Result<Envelope<serde_json::Value>> {
        let (status, text) = self.send_raw(Method::POST, path, None::<&()>).await?;
        self.check_status(status, &text)?;

        lenient_envelope(text)
    }

    /// Issue a DELETE request, tolerating non-JSON success bodies.
    ///
    /// Some backend delete handlers answer plain text; those replies are
    /// wrapped via [`Envelope::from_text`]. A reply that does parse as an
    /// envelope keeps its meaning: a 200 carrying `success: false` is still
    /// a failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply reports failure.
    pub async fn delete_lenient(&self, path: &str) -> Result<Envelope<serde_json::Value>> {
        let (status, text) = self
            .send_raw(Method::DELETE, path, None::<&()>)
            .await?;
        self.check_status(status, &text)?;

        lenient_envelope(text)
    }

    /// Execute a request and decode the JSON reply.
    async fn execute<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let (status, text) = self.send_raw(method, path, body).await?;
        self.check_status(status, &text)?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request and return the status plus raw body text.
    ///
    /// Reading the body as text first keeps error diagnostics useful even
    /// when the reply is not the JSON we expected.
    async fn send_raw<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(StatusCode, String)> {
        let url = self.endpoint_url(path)?;

        let mut request = self
            .inner
            .client
            .request(method, url)
            .header("X-Request-Id", Uuid::new_v4().to_string());

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from_transport)?;

        Ok((status, text))
    }

    /// Upload a file as multipart form data, reporting progress.
    ///
    /// The file part streams through a byte-counting body; `progress`
    /// receives monotonically non-decreasing integer percentages in
    /// `[0, 100]`. Uploads carry their own time ceiling instead of the
    /// plain request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply cannot be decoded.
    /// A 413 is classified as [`ApiError::PayloadTooLarge`].
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<(&'static str, String)>,
        file: UploadFile,
        progress: Option<ProgressCallback>,
    ) -> Result<T> {
        let url = self.endpoint_url(path)?;

        let mut form = reqwest::multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        form = form.part(file.field_name, progress_part(&file, progress)?);

        let response = self
            .inner
            .client
            .post(url)
            .header("X-Request-Id", Uuid::new_v4().to_string())
            // Content-type (with boundary) is set by the multipart encoder
            .multipart(form)
            .timeout(self.inner.upload_timeout)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(ApiError::from_transport)?;
        self.check_status(status, &text)?;

        serde_json::from_str(&text).map_err(ApiError::Parse)
    }

    /// Classify a non-success status into the error taxonomy, firing the
    /// unauthorized hook on 401.
    fn check_status(&self, status: StatusCode, body: &str) -> Result<()> {
        if status.is_success() {
            return Ok(());
        }

        let err = classify_status(status, body);
        tracing::error!(
            status = %status,
            error = %err,
            body = %body.chars().take(500).collect::<String>(),
            "Backend returned non-success status"
        );

        if err.invalidates_session()
            && let Ok(slot) = self.inner.unauthorized_hook.read()
            && let Some(hook) = slot.as_ref()
        {
            hook();
        }

        Err(err)
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }
}

/// Map a non-2xx status to an [`ApiError`].
///
/// A server-supplied `message` in a parseable JSON error body overrides the
/// canned text for plain validation errors; 401/403/413 keep their fixed
/// classification so callers can react to them structurally.
fn classify_status(status: StatusCode, body: &str) -> ApiError {
    let server_message = serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message);

    match status {
        StatusCode::UNAUTHORIZED => ApiError::SessionExpired,
        StatusCode::FORBIDDEN => ApiError::AccessDenied,
        StatusCode::NOT_FOUND => ApiError::NotFound(
            server_message.unwrap_or_else(|| "resource not found".to_string()),
        ),
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge,
        s if s.is_client_error() => ApiError::Validation(
            server_message.unwrap_or_else(|| format!("request rejected (HTTP {s})")),
        ),
        s => ApiError::Server(s.as_u16()),
    }
}

/// Normalize a lenient 2xx body.
///
/// Only a body that fails to parse as an envelope is treated as a
/// plain-text success reply; a parseable `success: false` envelope
/// surfaces as a validation error with the server's message.
fn lenient_envelope(text: String) -> Result<Envelope<serde_json::Value>> {
    match serde_json::from_str::<Envelope<serde_json::Value>>(&text) {
        Ok(envelope) if !envelope.success => Err(ApiError::Validation(
            envelope
                .message
                .unwrap_or_else(|| "request failed".to_string()),
        )),
        Ok(envelope) => Ok(envelope),
        Err(_) => Ok(Envelope::from_text(text)),
    }
}
