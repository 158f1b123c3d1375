//! Printastic client SDK.
//!
//! A session-aware REST client for the Printastic 3D-printing marketplace,
//! connecting customers, print-shop operators ("imprimeurs"), and the
//! platform administrator to the backend.
//!
//! # Architecture
//!
//! - [`http::ApiClient`] - one cookie-carrying transport; every response is
//!   classified into [`ApiError`] at this boundary
//! - [`session::SessionManager`] - single source of truth for "who is logged
//!   in", mirrored locally for fast startup; any 401 drops the session
//! - [`cart::Cart`] - in-memory line items with a derived total
//! - [`services`] - thin typed bindings per backend resource
//!
//! # Example
//!
//! ```rust,ignore
//! use printastic_client::{ClientConfig, Printastic};
//!
//! let app = Printastic::new(ClientConfig::from_env()?)?;
//! app.session().init().await;
//!
//! let user = app.session().login("a@b.com", "secret").await?;
//! let products = app.catalog().list_products().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod http;
pub mod services;
pub mod session;

pub use cart::{Cart, CartError, CartLine};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, Result};
pub use http::{ApiClient, Envelope, ProgressCallback, UploadFile};
pub use session::{AuthenticatedUser, SessionManager, SessionState};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use services::{
    CatalogService, ComplaintService, MaterialService, ModelService, OrderService, PaymentService,
    PrintingService,
};
use session::{FileMirror, MemoryMirror, SessionMirror};

/// The assembled client application.
///
/// Owns the transport, session, cart, and one instance of each feature
/// service. Cheaply cloneable via `Arc`; all clones share state.
#[derive(Clone)]
pub struct Printastic {
    inner: Arc<PrintasticInner>,
}

struct PrintasticInner {
    config: ClientConfig,
    session: SessionManager,
    cart: Mutex<Cart>,
    catalog: CatalogService,
    materials: MaterialService,
    orders: OrderService,
    printing: PrintingService,
    models: ModelService,
    payments: PaymentService,
    complaints: ComplaintService,
}

impl Printastic {
    /// Assemble the client from a configuration.
    ///
    /// The session mirror is file-backed when `config.session_cache` names a
    /// path, in-memory otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = ApiClient::new(&config)?;

        let mirror: Box<dyn SessionMirror> = match &config.session_cache {
            Some(path) => Box::new(FileMirror::new(path.clone())),
            None => Box::new(MemoryMirror::new()),
        };
        let session = SessionManager::new(api.clone(), mirror);

        Ok(Self {
            inner: Arc::new(PrintasticInner {
                catalog: CatalogService::new(api.clone()),
                materials: MaterialService::new(api.clone()),
                orders: OrderService::new(api.clone()),
                printing: PrintingService::new(api.clone()),
                models: ModelService::new(api.clone(), session.clone()),
                payments: PaymentService::new(api.clone()),
                complaints: ComplaintService::new(api),
                cart: Mutex::new(Cart::new()),
                session,
                config,
            }),
        })
    }

    /// Assemble the client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing/invalid or the HTTP
    /// client cannot be built.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The session manager.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    /// Exclusive access to the shared cart.
    #[must_use]
    pub fn cart(&self) -> MutexGuard<'_, Cart> {
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The product catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// The print-material service.
    #[must_use]
    pub fn materials(&self) -> &MaterialService {
        &self.inner.materials
    }

    /// The customer order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    /// The operator print-queue service.
    #[must_use]
    pub fn printing(&self) -> &PrintingService {
        &self.inner.printing
    }

    /// The personal 3D-model service.
    #[must_use]
    pub fn models(&self) -> &ModelService {
        &self.inner.models
    }

    /// The payment/checkout service.
    #[must_use]
    pub fn payments(&self) -> &PaymentService {
        &self.inner.payments
    }

    /// The complaints and incident-report service.
    #[must_use]
    pub fn complaints(&self) -> &ComplaintService {
        &self.inner.complaints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_assembles_and_shares_cart() {
        let config = ClientConfig::for_base_url("http://127.0.0.1:9").expect("config");
        let app = Printastic::new(config).expect("assemble");

        let clone = app.clone();
        app.cart()
            .add(CartLine {
                product_id: printastic_core::ProductId::new(7),
                name: "benchy".to_string(),
                unit_price: printastic_core::Price::from_cents(1000, printastic_core::CurrencyCode::EUR),
                quantity: 1,
                image_url: None,
            })
            .expect("add");

        // Clones see the same cart
        assert_eq!(clone.cart().len(), 1);
    }

    #[test]
    fn test_facade_starts_unknown_session() {
        let config = ClientConfig::for_base_url("http://127.0.0.1:9").expect("config");
        let app = Printastic::new(config).expect("assemble");
        assert_eq!(app.session().state(), SessionState::Unknown);
    }
}
