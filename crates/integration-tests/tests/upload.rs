//! Multipart upload behavior: the anonymous guard, progress reporting, and
//! oversize rejection.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use printastic_client::services::ModelUpload;
use printastic_client::{ApiError, ClientConfig, Printastic, ProgressCallback, UploadFile};
use printastic_core::{MaterialId, ModelId};
use printastic_integration_tests::{MockBackend, UPLOAD_LIMIT_BYTES};

fn app_for(backend: &MockBackend) -> Printastic {
    let config = ClientConfig::for_base_url(&backend.base_url).expect("config");
    Printastic::new(config).expect("assemble")
}

fn model_upload(size: usize) -> ModelUpload {
    ModelUpload {
        file: UploadFile::new(
            "benchy.stl",
            "application/octet-stream",
            Bytes::from(vec![0u8; size]),
        ),
        scaling_percent: 100,
        description: "calibration boat".to_string(),
        material_id: MaterialId::new(2),
        custom_name: None,
        country: "FR".to_string(),
    }
}

fn collecting_callback() -> (ProgressCallback, Arc<Mutex<Vec<u8>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: ProgressCallback = Arc::new(move |pct| {
        sink.lock().expect("progress sink").push(pct);
    });
    (callback, seen)
}

#[tokio::test]
async fn test_upload_while_anonymous_never_reaches_the_network() {
    let backend = MockBackend::spawn().await;
    let app = app_for(&backend);
    app.session().init().await;

    let err = app
        .models()
        .upload(model_upload(1024), None)
        .await
        .expect_err("anonymous");

    assert!(matches!(err, ApiError::NotAuthenticated));
    assert_eq!(err.to_string(), "you must be logged in to do this");
    assert_eq!(backend.upload_hits(), 0, "guard runs before any request");
}

#[tokio::test]
async fn test_upload_reports_monotonic_progress() {
    let backend = MockBackend::spawn().await;
    let app = app_for(&backend);
    app.session().login("a@b.com", "x").await.expect("login");

    let (callback, seen) = collecting_callback();
    let model = app
        .models()
        .upload(model_upload(150 * 1024), Some(callback))
        .await
        .expect("upload");

    assert_eq!(model.id, ModelId::new(3));

    let seen = seen.lock().expect("progress sink");
    assert!(!seen.is_empty());
    assert_eq!(*seen.last().expect("final report"), 100);
    for pair in seen.windows(2) {
        assert!(pair[0] < pair[1], "progress must not go backwards");
    }
    assert!(seen.iter().all(|&pct| pct <= 100));
}

#[tokio::test]
async fn test_oversize_upload_surfaces_as_file_too_large() {
    let backend = MockBackend::spawn().await;
    let app = app_for(&backend);
    app.session().login("a@b.com", "x").await.expect("login");

    let err = app
        .models()
        .upload(model_upload(UPLOAD_LIMIT_BYTES + 1), None)
        .await
        .expect_err("oversize");

    assert!(matches!(err, ApiError::PayloadTooLarge));
    assert_eq!(err.to_string(), "file too large");
}
