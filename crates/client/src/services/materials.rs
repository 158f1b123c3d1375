//! Print material catalog service.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use printastic_core::{MaterialId, Price};

use crate::error::Result;
use crate::http::{ApiClient, Envelope};

const CACHE_TTL: Duration = Duration::from_secs(300);

/// A printable material (e.g. PLA, resin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    #[serde(rename = "nom")]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "prixParGramme")]
    pub price_per_gram: Price,
    pub available: bool,
}

/// Payload for creating or updating a material (admin only).
#[derive(Debug, Clone, Serialize)]
pub struct MaterialInput {
    #[serde(rename = "nom")]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "prixParGramme")]
    pub price_per_gram: Price,
    pub available: bool,
}

/// Service for `/materiaux`.
#[derive(Clone)]
pub struct MaterialService {
    inner: Arc<MaterialServiceInner>,
}

struct MaterialServiceInner {
    api: ApiClient,
    cache: Cache<String, Vec<Material>>,
}

impl MaterialService {
    pub(crate) fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(MaterialServiceInner { api, cache }),
        }
    }

    /// Materials currently offered for printing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn available(&self) -> Result<Vec<Material>> {
        let cache_key = "available".to_string();

        if let Some(materials) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for available materials");
            return Ok(materials);
        }

        let materials = self
            .inner
            .api
            .get::<Envelope<Vec<Material>>>("/materiaux/available")
            .await?
            .into_result()?;

        self.inner.cache.insert(cache_key, materials.clone()).await;
        Ok(materials)
    }

    /// Every material, including unavailable ones (admin view).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn all(&self) -> Result<Vec<Material>> {
        self.inner
            .api
            .get::<Envelope<Vec<Material>>>("/materiaux/all")
            .await?
            .into_result()
    }

    /// Get a single material.
    ///
    /// # Errors
    ///
    /// Returns an error if the material is not found or the request fails.
    #[instrument(skip(self), fields(material_id = %material_id))]
    pub async fn get(&self, material_id: MaterialId) -> Result<Material> {
        self.inner
            .api
            .get::<Envelope<Material>>(&format!("/materiaux/{material_id}"))
            .await?
            .into_result()
    }

    /// Create a material (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: &MaterialInput) -> Result<Material> {
        let material = self
            .inner
            .api
            .post::<Envelope<Material>, _>("/materiaux", input)
            .await?
            .into_result()?;

        self.inner.cache.invalidate_all();
        Ok(material)
    }

    /// Update a material (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, input), fields(material_id = %material_id))]
    pub async fn update(&self, material_id: MaterialId, input: &MaterialInput) -> Result<Material> {
        let material = self
            .inner
            .api
            .put::<Envelope<Material>, _>(&format!("/materiaux/{material_id}"), input)
            .await?
            .into_result()?;

        self.inner.cache.invalidate_all();
        Ok(material)
    }

    /// Delete a material (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self), fields(material_id = %material_id))]
    pub async fn delete(&self, material_id: MaterialId) -> Result<()> {
        self.inner
            .api
            .delete_lenient(&format!("/materiaux/{material_id}"))
            .await?;

        self.inner.cache.invalidate_all();
        Ok(())
    }
}
