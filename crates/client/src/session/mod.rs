//! Session state: the single source of truth for "who is logged in".
//!
//! Backed by the server's session-check endpoint, with a local mirror for
//! fast startup. The server is authoritative: the mirror only pre-populates
//! state until the first session check answers.
//!
//! Any 401 observed anywhere in the transport drops the session here, via
//! the unauthorized hook registered at construction - feature services never
//! special-case 401 themselves.

mod mirror;

pub use mirror::{FileMirror, MemoryMirror, SessionMirror};

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use printastic_core::{Email, UserId, UserRole};

use crate::error::{ApiError, Result};
use crate::http::ApiClient;

/// The currently authenticated user, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "nom")]
    pub last_name: String,
    pub role: UserRole,
}

/// Authentication state of the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session check has completed yet.
    #[default]
    Unknown,
    /// The backend confirmed this user's session.
    Authenticated(AuthenticatedUser),
    /// No valid session exists.
    Anonymous,
}

impl SessionState {
    /// Whether this state carries a confirmed user.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Reply shape of `/auth/connexion` and `/auth/profil`.
#[derive(Debug, Deserialize)]
struct SessionReply {
    success: bool,
    message: Option<String>,
    utilisateur: Option<AuthenticatedUser>,
}

/// Process-wide session manager.
///
/// Cheaply cloneable; all clones share one state. There is exactly one
/// writer path per transition (login, logout, refresh, the 401 hook), so a
/// plain `RwLock` suffices.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

struct SessionManagerInner {
    api: ApiClient,
    mirror: Box<dyn SessionMirror>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// Create a session manager and register the transport's 401 hook.
    ///
    /// The mirror pre-populates state for fast startup; call [`Self::init`]
    /// to let the server confirm or revoke it.
    #[must_use]
    pub fn new(api: ApiClient, mirror: Box<dyn SessionMirror>) -> Self {
        let initial = mirror
            .load()
            .map_or(SessionState::Unknown, SessionState::Authenticated);

        let manager = Self {
            inner: Arc::new(SessionManagerInner {
                api: api.clone(),
                mirror,
                state: RwLock::new(initial),
            }),
        };

        // Weak reference: the client outlives no one, and a strong reference
        // here would cycle through the hook back to the client.
        let weak = Arc::downgrade(&manager.inner);
        api.set_unauthorized_hook(move || {
            if let Some(inner) = weak.upgrade() {
                debug!("Session invalidated by a 401 response");
                inner.clear_local();
            }
        });

        manager
    }

    /// Current state (cloned snapshot).
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner
            .state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// The confirmed user, if authenticated.
    #[must_use]
    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        match self.state() {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Whether a confirmed session exists right now.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Guard for operations that must not reach the network while anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotAuthenticated`] when no confirmed session
    /// exists.
    pub fn require_authenticated(&self) -> Result<AuthenticatedUser> {
        self.current_user().ok_or(ApiError::NotAuthenticated)
    }

    /// Run the startup session check.
    pub async fn init(&self) -> SessionState {
        self.refresh().await
    }

    /// Re-run the session check against `/auth/profil`.
    ///
    /// Success with a user payload confirms the session; any failure -
    /// including a 401 - drops to [`SessionState::Anonymous`] and clears the
    /// mirror.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> SessionState {
        match self.inner.api.get::<SessionReply>("/auth/profil").await {
            Ok(reply) if reply.success => match reply.utilisateur {
                Some(user) => {
                    self.inner.set_authenticated(user);
                }
                None => {
                    debug!("Session check answered without a user payload");
                    self.inner.clear_local();
                }
            },
            Ok(reply) => {
                debug!(message = ?reply.message, "Session check reported no session");
                self.inner.clear_local();
            }
            Err(e) => {
                debug!(error = %e, "Session check failed");
                self.inner.clear_local();
            }
        }

        self.state()
    }

    /// Exchange credentials for a session cookie.
    ///
    /// On success the user is held in memory and mirrored locally. On
    /// failure the state drops to anonymous and the error - carrying the
    /// server's message verbatim for credential rejections - propagates so a
    /// login form can render it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] before any network call when the
    /// email is malformed, the transport error, or [`ApiError::Validation`]
    /// with the server's message when credentials are rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser> {
        let email = Email::parse(email).map_err(|e| ApiError::Validation(e.to_string()))?;

        let request = LoginRequest {
            email: email.as_str(),
            password,
        };

        let reply = match self
            .inner
            .api
            .post::<SessionReply, _>("/auth/connexion", &request)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                self.inner.clear_local();
                return Err(e);
            }
        };

        if !reply.success {
            self.inner.clear_local();
            return Err(ApiError::Validation(
                reply
                    .message
                    .unwrap_or_else(|| "invalid credentials".to_string()),
            ));
        }

        let user = reply.utilisateur.ok_or_else(|| {
            self.inner.clear_local();
            ApiError::Validation("login reply carried no user".to_string())
        })?;

        self.inner.set_authenticated(user.clone());
        Ok(user)
    }

    /// Invalidate the session.
    ///
    /// The server-side call is best-effort: a failure is logged, never
    /// surfaced. Memory and mirror are cleared unconditionally.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.inner.api.post_empty("/auth/deconnexion").await {
            warn!(error = %e, "Server-side logout failed, clearing local session anyway");
        }
        self.inner.clear_local();
    }
}

impl SessionManagerInner {
    fn set_authenticated(&self, user: AuthenticatedUser) {
        self.mirror.store(&user);
        if let Ok(mut state) = self.state.write() {
            *state = SessionState::Authenticated(user);
        }
    }

    fn clear_local(&self) {
        self.mirror.clear();
        if let Ok(mut state) = self.state.write() {
            *state = SessionState::Anonymous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn test_client() -> ApiClient {
        let config = ClientConfig::for_base_url("http://127.0.0.1:9").expect("config");
        ApiClient::new(&config).expect("client")
    }

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(1),
            email: "a@b.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: UserRole::Client,
        }
    }

    #[test]
    fn test_initial_state_unknown_without_mirror() {
        let manager = SessionManager::new(test_client(), Box::new(MemoryMirror::new()));
        assert_eq!(manager.state(), SessionState::Unknown);
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_mirror_prepopulates_state() {
        let mirror = MemoryMirror::new();
        mirror.store(&sample_user());

        let manager = SessionManager::new(test_client(), Box::new(mirror));
        assert_eq!(
            manager.state(),
            SessionState::Authenticated(sample_user())
        );
        assert_eq!(manager.current_user(), Some(sample_user()));
    }

    #[test]
    fn test_require_authenticated_while_anonymous() {
        let manager = SessionManager::new(test_client(), Box::new(MemoryMirror::new()));
        let err = manager.require_authenticated().expect_err("anonymous");
        assert!(matches!(err, ApiError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_refresh_against_unreachable_backend_clears_state() {
        // Port 9 (discard) refuses connections; the check must fail closed.
        let mirror = MemoryMirror::new();
        mirror.store(&sample_user());

        let manager = SessionManager::new(test_client(), Box::new(mirror));
        assert!(manager.is_authenticated(), "mirror pre-populated");

        let state = manager.refresh().await;
        assert_eq!(state, SessionState::Anonymous);
        assert!(manager.current_user().is_none());
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_email_locally() {
        // Unreachable backend: the validation must trip before any request.
        let manager = SessionManager::new(test_client(), Box::new(MemoryMirror::new()));
        let err = manager.login("not-an-email", "x").await.expect_err("invalid");
        assert_eq!(err.to_string(), "email must contain an @ symbol");
    }

    #[test]
    fn test_user_wire_shape() {
        let json = r#"{"id": 1, "email": "a@b.com", "prenom": "Ada", "nom": "Lovelace", "role": "CLIENT"}"#;
        let user: AuthenticatedUser = serde_json::from_str(json).expect("parse");
        assert_eq!(user, sample_user());
    }
}
