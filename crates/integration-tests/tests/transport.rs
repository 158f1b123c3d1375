//! Transport behavior over real HTTP: status classification, validation
//! message pass-through, caching, and connection failures.

use std::time::Duration;

use printastic_client::{ApiError, ClientConfig, Printastic};
use printastic_core::{ModelId, OrderId, ProductId};
use printastic_integration_tests::MockBackend;
use rust_decimal::Decimal;

fn app_for(backend: &MockBackend) -> Printastic {
    let config = ClientConfig::for_base_url(&backend.base_url).expect("config");
    Printastic::new(config).expect("assemble")
}

#[tokio::test]
async fn test_403_classified_as_access_denied() {
    let backend = MockBackend::spawn().await;
    let app = app_for(&backend);

    let err = app
        .printing()
        .unassigned_jobs()
        .await
        .expect_err("forbidden");

    assert!(matches!(err, ApiError::AccessDenied));
    assert_eq!(err.to_string(), "access denied");
}

#[tokio::test]
async fn test_500_never_exposes_internal_details() {
    let backend = MockBackend::spawn().await;
    let app = app_for(&backend);

    let err = app.materials().available().await.expect_err("server error");

    assert!(matches!(err, ApiError::Server(500)));
    assert_eq!(err.to_string(), "server error, please try again later");
    assert!(!err.to_string().contains("database"));
}

#[tokio::test]
async fn test_validation_message_passes_through_verbatim() {
    let backend = MockBackend::spawn().await;
    let app = app_for(&backend);

    let input = printastic_client::services::ComplaintInput {
        order_id: OrderId::new(1),
        subject: String::new(),
        body: "arrived broken".to_string(),
    };
    let err = app
        .complaints()
        .file_complaint(&input)
        .await
        .expect_err("rejected");

    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(err.to_string(), "sujet manquant");
}

#[tokio::test]
async fn test_catalog_reads_are_cached() {
    let backend = MockBackend::spawn().await;
    let app = app_for(&backend);

    let first = app.catalog().list_products().await.expect("products");
    let second = app.catalog().list_products().await.expect("products");

    assert_eq!(backend.products_hits(), 1, "second read served from cache");
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);

    let product = &first[0];
    assert_eq!(product.id, ProductId::new(7));
    assert_eq!(product.name, "Benchy");
    assert_eq!(product.price.amount, Decimal::new(1000, 2));
}

#[tokio::test]
async fn test_200_with_success_false_is_still_a_failure() {
    let backend = MockBackend::spawn().await;
    let app = app_for(&backend);

    // The backend deletes with HTTP 200 either way; the envelope decides
    app.models().delete(ModelId::new(3)).await.expect("deleted");

    let err = app
        .models()
        .delete(ModelId::new(99))
        .await
        .expect_err("rejected");
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(err.to_string(), "mod\u{e8}le introuvable");
}

#[tokio::test]
async fn test_slow_backend_is_a_timeout() {
    let backend = MockBackend::spawn().await;
    let mut config = ClientConfig::for_base_url(&backend.base_url).expect("config");
    config.request_timeout = Duration::from_millis(100);
    let app = Printastic::new(config).expect("assemble");

    let err = app.materials().all().await.expect_err("timed out");
    assert!(matches!(err, ApiError::Timeout));
    assert_eq!(err.to_string(), "the request timed out, please try again");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_connection_error() {
    // Nothing listens on this port
    let config = ClientConfig::for_base_url("http://127.0.0.1:1").expect("config");
    let app = Printastic::new(config).expect("assemble");

    let err = app.catalog().list_products().await.expect_err("refused");
    assert!(matches!(err, ApiError::Connection(_)));
    assert_eq!(
        err.to_string(),
        "connection problem, please check your network"
    );
}
