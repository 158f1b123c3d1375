//! Personal 3D model service: upload, listing, deletion, verification.
//!
//! Uploading requires a confirmed session; the guard runs before any network
//! call so an anonymous caller never starts a transfer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use printastic_core::{MaterialId, ModelId, ModelVerification, UserId};

use crate::error::Result;
use crate::http::{ApiClient, Envelope, ProgressCallback, UploadFile};
use crate::session::SessionManager;

/// A customer-uploaded 3D model, as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model3D {
    pub id: ModelId,
    #[serde(rename = "nom")]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "materiau")]
    pub material_id: MaterialId,
    #[serde(rename = "proprietaire")]
    pub owner_id: UserId,
    pub verification: ModelVerification,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// A model staged for upload, with its print parameters.
#[derive(Debug, Clone)]
pub struct ModelUpload {
    /// The model file (STL, OBJ, ...).
    pub file: UploadFile,
    /// Scaling factor in percent.
    pub scaling_percent: u32,
    /// Free-text description.
    pub description: String,
    /// Material to print with.
    pub material_id: MaterialId,
    /// Optional display name overriding the file name.
    pub custom_name: Option<String>,
    /// Shipping country.
    pub country: String,
}

#[derive(Serialize)]
struct VerificationUpdate {
    verification: ModelVerification,
}

/// Service for `/modele3DClient`.
#[derive(Clone)]
pub struct ModelService {
    api: ApiClient,
    session: SessionManager,
}

impl ModelService {
    pub(crate) const fn new(api: ApiClient, session: SessionManager) -> Self {
        Self { api, session }
    }

    /// Upload a model as multipart form data.
    ///
    /// `progress`, when supplied, receives monotonically non-decreasing
    /// integer percentages in `[0, 100]` as the file streams out.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::NotAuthenticated`] before any network call
    /// when no session exists; otherwise the transport's classification
    /// (a 413 surfaces as "file too large").
    #[instrument(skip(self, upload, progress), fields(file_name = %upload.file.file_name))]
    pub async fn upload(
        &self,
        upload: ModelUpload,
        progress: Option<ProgressCallback>,
    ) -> Result<Model3D> {
        self.session.require_authenticated()?;

        let mut fields = vec![
            ("scaling", upload.scaling_percent.to_string()),
            ("description", upload.description),
            ("materiauId", upload.material_id.to_string()),
            ("pays", upload.country),
        ];
        if let Some(name) = upload.custom_name {
            fields.push(("nomPersonnalise", name));
        }

        self.api
            .upload::<Envelope<Model3D>>("/modele3DClient/upload", fields, upload.file, progress)
            .await?
            .into_result()
    }

    /// All models visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Model3D>> {
        self.api
            .get::<Envelope<Vec<Model3D>>>("/modele3DClient")
            .await?
            .into_result()
    }

    /// The calling customer's own models.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn my_models(&self) -> Result<Vec<Model3D>> {
        self.api
            .get::<Envelope<Vec<Model3D>>>("/modele3DClient/my-models")
            .await?
            .into_result()
    }

    /// Delete a model.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self), fields(model_id = %model_id))]
    pub async fn delete(&self, model_id: ModelId) -> Result<()> {
        self.api
            .delete_lenient(&format!("/modele3DClient/{model_id}"))
            .await?;
        Ok(())
    }

    /// Set the printability verification of a model (operator/admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self), fields(model_id = %model_id, verification = ?verification))]
    pub async fn set_verification(
        &self,
        model_id: ModelId,
        verification: ModelVerification,
    ) -> Result<Model3D> {
        self.api
            .put::<Envelope<Model3D>, _>(
                &format!("/modele3DClient/{model_id}/verification"),
                &VerificationUpdate { verification },
            )
            .await?
            .into_result()
    }
}
