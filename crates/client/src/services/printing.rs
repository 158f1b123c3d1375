//! Print-job queue service for operators (imprimeurs).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use printastic_core::{MaterialId, PrintJobId, PrintJobStatus, UserId};

use crate::error::Result;
use crate::http::{ApiClient, Envelope};

/// A print job in the operator queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: PrintJobId,
    #[serde(rename = "nomModele")]
    pub model_name: String,
    #[serde(rename = "materiau")]
    pub material_id: MaterialId,
    #[serde(rename = "statut")]
    pub status: PrintJobStatus,
    #[serde(rename = "imprimeur")]
    pub claimed_by: Option<UserId>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct ClaimRequest {
    #[serde(rename = "jobId")]
    job_id: PrintJobId,
}

/// Service for `/impression`.
#[derive(Clone)]
pub struct PrintingService {
    api: ApiClient,
}

impl PrintingService {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Jobs not yet claimed by any operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn unassigned_jobs(&self) -> Result<Vec<PrintJob>> {
        self.api
            .get::<Envelope<Vec<PrintJob>>>("/impression/non-attribuees")
            .await?
            .into_result()
    }

    /// Claim an unassigned job for the calling operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the job is already claimed or the request fails.
    #[instrument(skip(self), fields(job_id = %job_id))]
    pub async fn claim_job(&self, job_id: PrintJobId) -> Result<PrintJob> {
        self.api
            .post::<Envelope<PrintJob>, _>("/impression/prendre", &ClaimRequest { job_id })
            .await?
            .into_result()
    }

    /// Jobs claimed by a given operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(operator_id = %operator_id))]
    pub async fn operator_jobs(&self, operator_id: UserId) -> Result<Vec<PrintJob>> {
        self.api
            .get::<Envelope<Vec<PrintJob>>>(&format!("/impression/imprimeur/{operator_id}"))
            .await?
            .into_result()
    }
}
