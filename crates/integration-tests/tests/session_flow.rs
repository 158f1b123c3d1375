//! End-to-end session lifecycle: login, session check, logout, and
//! 401-driven invalidation, all over real cookie-carrying HTTP.

use std::sync::Arc;

use printastic_client::session::{MemoryMirror, SessionMirror};
use printastic_client::{
    ApiClient, ApiError, ClientConfig, Printastic, SessionManager, SessionState,
};
use printastic_core::{UserId, UserRole};
use printastic_integration_tests::MockBackend;

fn config_for(backend: &MockBackend) -> ClientConfig {
    ClientConfig::for_base_url(&backend.base_url).expect("config")
}

#[tokio::test]
async fn test_login_success_populates_state_and_mirror() {
    let backend = MockBackend::spawn().await;
    let api = ApiClient::new(&config_for(&backend)).expect("client");

    let mirror = Arc::new(MemoryMirror::new());
    let session = SessionManager::new(api, Box::new(Arc::clone(&mirror)));

    let user = session.login("a@b.com", "x").await.expect("login");

    assert_eq!(user.id, UserId::new(1));
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.role, UserRole::Client);
    assert_eq!(session.state(), SessionState::Authenticated(user.clone()));
    // The local mirror holds the same record
    assert_eq!(mirror.load(), Some(user));
}

#[tokio::test]
async fn test_login_failure_clears_state_and_surfaces_server_message() {
    let backend = MockBackend::spawn().await;
    let api = ApiClient::new(&config_for(&backend)).expect("client");

    let mirror = Arc::new(MemoryMirror::new());
    let session = SessionManager::new(api, Box::new(Arc::clone(&mirror)));

    let err = session
        .login("a@b.com", "wrong")
        .await
        .expect_err("bad credentials");

    assert_eq!(err.to_string(), "bad credentials");
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(mirror.load().is_none());
}

#[tokio::test]
async fn test_session_check_confirms_cookie_session() {
    let backend = MockBackend::spawn().await;
    let app = Printastic::new(config_for(&backend)).expect("assemble");

    app.session().login("a@b.com", "x").await.expect("login");

    // The session cookie carries over to the session check
    let state = app.session().refresh().await;
    assert!(state.is_authenticated());
}

#[tokio::test]
async fn test_init_without_session_is_anonymous() {
    let backend = MockBackend::spawn().await;
    let app = Printastic::new(config_for(&backend)).expect("assemble");

    assert_eq!(app.session().init().await, SessionState::Anonymous);
    assert!(app.session().current_user().is_none());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let backend = MockBackend::spawn().await;
    let app = Printastic::new(config_for(&backend)).expect("assemble");

    app.session().login("a@b.com", "x").await.expect("login");
    assert!(app.session().is_authenticated());

    app.session().logout().await;
    assert_eq!(app.session().state(), SessionState::Anonymous);

    // The server also dropped the cookie's session
    assert_eq!(app.session().refresh().await, SessionState::Anonymous);
}

#[tokio::test]
async fn test_transport_401_drops_session_centrally() {
    let backend = MockBackend::spawn().await;
    let app = Printastic::new(config_for(&backend)).expect("assemble");

    app.session().login("a@b.com", "x").await.expect("login");
    assert!(app.session().is_authenticated());

    // Server-side expiry: the next feature call sees a 401...
    backend.revoke_sessions();
    let err = app.orders().my_orders().await.expect_err("expired");
    assert!(matches!(err, ApiError::SessionExpired));

    // ...and the session layer already consumed it, no per-call handling
    assert_eq!(app.session().state(), SessionState::Anonymous);
}
