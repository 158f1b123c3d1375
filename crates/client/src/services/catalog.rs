//! Product catalog service.
//!
//! Read paths are cached for 5 minutes; mutations invalidate the affected
//! entries so admin edits show up on the next read.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use printastic_core::{MaterialId, Price, ProductId};

use crate::error::Result;
use crate::http::{ApiClient, Envelope};

const CACHE_TTL: Duration = Duration::from_secs(300);
const CACHE_CAPACITY: u64 = 1000;

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nom")]
    pub name: String,
    pub description: String,
    #[serde(rename = "prix")]
    pub price: Price,
    #[serde(rename = "materiau")]
    pub material_id: MaterialId,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating or updating a product (admin only).
#[derive(Debug, Clone, Serialize)]
pub struct ProductInput {
    #[serde(rename = "nom")]
    pub name: String,
    pub description: String,
    #[serde(rename = "prix")]
    pub price: Price,
    #[serde(rename = "materiau")]
    pub material_id: MaterialId,
    pub image_url: Option<String>,
}

#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}

/// Service for `/produits`.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    api: ApiClient,
    cache: Cache<String, CacheValue>,
}

impl CatalogService {
    pub(crate) fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogServiceInner { api, cache }),
        }
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let cache_key = "products".to_string();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = self
            .inner
            .api
            .get::<Envelope<Vec<Product>>>("/produits")
            .await?
            .into_result()?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product = self
            .inner
            .api
            .get::<Envelope<Product>>(&format!("/produits/{product_id}"))
            .await?
            .into_result()?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Create a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product> {
        let product = self
            .inner
            .api
            .post::<Envelope<Product>, _>("/produits", input)
            .await?
            .into_result()?;

        self.invalidate_listing().await;
        Ok(product)
    }

    /// Update a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, input), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: ProductId,
        input: &ProductInput,
    ) -> Result<Product> {
        let product = self
            .inner
            .api
            .put::<Envelope<Product>, _>(&format!("/produits/{product_id}"), input)
            .await?
            .into_result()?;

        self.inner
            .cache
            .invalidate(&format!("product:{product_id}"))
            .await;
        self.invalidate_listing().await;
        Ok(product)
    }

    /// Delete a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete_product(&self, product_id: ProductId) -> Result<()> {
        self.inner
            .api
            .delete_lenient(&format!("/produits/{product_id}"))
            .await?;

        self.inner
            .cache
            .invalidate(&format!("product:{product_id}"))
            .await;
        self.invalidate_listing().await;
        Ok(())
    }

    async fn invalidate_listing(&self) {
        self.inner.cache.invalidate(&"products".to_string()).await;
    }
}
