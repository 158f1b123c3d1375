//! Integration tests for the Printastic client SDK.
//!
//! The harness spawns an in-process mock of the Printastic REST backend on
//! an ephemeral port and drives the real client against it: cookie-session
//! login, status-code classification, caching, and multipart uploads.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p printastic-integration-tests
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use serde_json::{Value, json};

/// Session cookie issued by the mock backend.
const SESSION_COOKIE: &str = "printastic_session=tok-1";

/// Upload size the mock backend accepts before answering 413.
pub const UPLOAD_LIMIT_BYTES: usize = 300 * 1024;

/// Shared observable state of the mock backend.
pub struct MockState {
    products_hits: AtomicUsize,
    upload_hits: AtomicUsize,
    sessions_revoked: AtomicBool,
}

/// A mock Printastic backend bound to an ephemeral local port.
pub struct MockBackend {
    /// Base URL to hand to `ClientConfig::for_base_url`.
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Spawn the mock backend. The server task lives until the runtime stops.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind.
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState {
            products_hits: AtomicUsize::new(0),
            upload_hits: AtomicUsize::new(0),
            sessions_revoked: AtomicBool::new(false),
        });

        let app = axum::Router::new()
            .route("/auth/connexion", post(login))
            .route("/auth/deconnexion", post(logout))
            .route("/auth/profil", get(profile))
            .route("/produits", get(list_products))
            .route("/commandes/mes-commandes", get(my_orders))
            .route("/impression/non-attribuees", get(unassigned_jobs))
            .route("/materiaux/available", get(available_materials))
            .route("/materiaux/all", get(all_materials_slowly))
            .route("/reclamations", post(file_complaint))
            .route("/modele3DClient/upload", post(upload_model))
            .route("/modele3DClient/{id}", delete(delete_model))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// How many times `/produits` was hit.
    #[must_use]
    pub fn products_hits(&self) -> usize {
        self.state.products_hits.load(Ordering::SeqCst)
    }

    /// How many times the upload endpoint was hit.
    #[must_use]
    pub fn upload_hits(&self) -> usize {
        self.state.upload_hits.load(Ordering::SeqCst)
    }

    /// Make the backend reject the issued session cookie from now on,
    /// simulating server-side expiry.
    pub fn revoke_sessions(&self) {
        self.state.sessions_revoked.store(true, Ordering::SeqCst);
    }
}

fn session_valid(state: &MockState, headers: &HeaderMap) -> bool {
    if state.sessions_revoked.load(Ordering::SeqCst) {
        return false;
    }
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|cookies| cookies.contains(SESSION_COOKIE))
}

fn sample_user() -> Value {
    json!({
        "id": 1,
        "email": "a@b.com",
        "prenom": "Ada",
        "nom": "Lovelace",
        "role": "CLIENT"
    })
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "message": "session expir\u{e9}e"})),
    )
        .into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let email = body.get("email").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);

    if email == Some("a@b.com") && password == Some("x") {
        state.sessions_revoked.store(false, Ordering::SeqCst);
        (
            StatusCode::OK,
            [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
            Json(json!({"success": true, "utilisateur": sample_user()})),
        )
            .into_response()
    } else {
        (
            StatusCode::OK,
            Json(json!({"success": false, "message": "bad credentials"})),
        )
            .into_response()
    }
}

async fn logout(State(state): State<Arc<MockState>>) -> Response {
    state.sessions_revoked.store(true, Ordering::SeqCst);
    Json(json!({"success": true})).into_response()
}

async fn profile(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if session_valid(&state, &headers) {
        Json(json!({"success": true, "utilisateur": sample_user()})).into_response()
    } else {
        unauthorized()
    }
}

async fn list_products(State(state): State<Arc<MockState>>) -> Response {
    state.products_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "success": true,
        "data": [{
            "id": 7,
            "nom": "Benchy",
            "description": "calibration boat",
            "prix": {"amount": "10.00", "currency_code": "EUR"},
            "materiau": 2,
            "image_url": "https://cdn.printastic.example/benchy.png"
        }]
    }))
    .into_response()
}

async fn my_orders(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if session_valid(&state, &headers) {
        Json(json!({"success": true, "data": []})).into_response()
    } else {
        unauthorized()
    }
}

async fn unassigned_jobs() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"success": false, "message": "r\u{e9}serv\u{e9} aux imprimeurs"})),
    )
        .into_response()
}

async fn available_materials() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"success": false, "message": "database exploded, very internal"})),
    )
        .into_response()
}

// Answers only after a pause; pair with a short client timeout
async fn all_materials_slowly() -> Response {
    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    Json(json!({"success": true, "data": []})).into_response()
}

// The backend's delete convention: HTTP 200 either way, failures carried
// in the envelope
async fn delete_model(Path(id): Path<i64>) -> Response {
    if id == 3 {
        Json(json!({"success": true, "message": "mod\u{e8}le supprim\u{e9}"})).into_response()
    } else {
        Json(json!({"success": false, "message": "mod\u{e8}le introuvable"})).into_response()
    }
}

async fn file_complaint(Json(body): Json<Value>) -> Response {
    let subject = body.get("sujet").and_then(Value::as_str).unwrap_or_default();
    if subject.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "sujet manquant"})),
        )
            .into_response();
    }

    Json(json!({
        "success": true,
        "data": {
            "id": 12,
            "commande": body.get("commande").cloned().unwrap_or(json!(1)),
            "sujet": subject,
            "contenu": body.get("contenu").cloned().unwrap_or(json!("")),
            "statut": "OPEN"
        }
    }))
    .into_response()
}

async fn upload_model(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    state.upload_hits.fetch_add(1, Ordering::SeqCst);

    if !session_valid(&state, &headers) {
        return unauthorized();
    }

    let mut file_size = 0usize;
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let is_file = field.name() == Some("file");
        let bytes = field.bytes().await.expect("field bytes");
        if is_file {
            file_size = bytes.len();
        }
    }

    if file_size > UPLOAD_LIMIT_BYTES {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(json!({"success": false, "message": "fichier trop volumineux"})),
        )
            .into_response();
    }

    Json(json!({
        "success": true,
        "data": {
            "id": 3,
            "nom": "benchy.stl",
            "description": "calibration boat",
            "materiau": 2,
            "proprietaire": 1,
            "verification": "PENDING"
        }
    }))
    .into_response()
}
