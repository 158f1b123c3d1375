//! Customer complaints and operator incident reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use printastic_core::{ComplaintId, ComplaintStatus, IncidentReportId, OrderId, PrintJobId};

use crate::error::Result;
use crate::http::{ApiClient, Envelope};

/// A customer complaint about an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: ComplaintId,
    #[serde(rename = "commande")]
    pub order_id: OrderId,
    #[serde(rename = "sujet")]
    pub subject: String,
    #[serde(rename = "contenu")]
    pub body: String,
    #[serde(rename = "statut")]
    pub status: ComplaintStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for filing a complaint.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintInput {
    #[serde(rename = "commande")]
    pub order_id: OrderId,
    #[serde(rename = "sujet")]
    pub subject: String,
    #[serde(rename = "contenu")]
    pub body: String,
}

/// An operator-filed incident report about a print job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentReport {
    pub id: IncidentReportId,
    #[serde(rename = "job")]
    pub job_id: PrintJobId,
    #[serde(rename = "contenu")]
    pub body: String,
    #[serde(rename = "statut")]
    pub status: ComplaintStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for filing an incident report.
#[derive(Debug, Clone, Serialize)]
pub struct IncidentReportInput {
    #[serde(rename = "job")]
    pub job_id: PrintJobId,
    #[serde(rename = "contenu")]
    pub body: String,
}

#[derive(Serialize)]
struct StatusUpdate {
    #[serde(rename = "statut")]
    status: ComplaintStatus,
}

/// Service for `/reclamations` and `/signalements`.
#[derive(Clone)]
pub struct ComplaintService {
    api: ApiClient,
}

impl ComplaintService {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    // =========================================================================
    // Customer complaints
    // =========================================================================

    /// The calling customer's complaints.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn my_complaints(&self) -> Result<Vec<Complaint>> {
        self.api
            .get::<Envelope<Vec<Complaint>>>("/reclamations/mes-reclamations")
            .await?
            .into_result()
    }

    /// Every complaint (admin view).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn all_complaints(&self) -> Result<Vec<Complaint>> {
        self.api
            .get::<Envelope<Vec<Complaint>>>("/reclamations")
            .await?
            .into_result()
    }

    /// File a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, input))]
    pub async fn file_complaint(&self, input: &ComplaintInput) -> Result<Complaint> {
        self.api
            .post::<Envelope<Complaint>, _>("/reclamations", input)
            .await?
            .into_result()
    }

    /// Transition a complaint's status (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self), fields(complaint_id = %complaint_id, status = ?status))]
    pub async fn set_complaint_status(
        &self,
        complaint_id: ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint> {
        self.api
            .put::<Envelope<Complaint>, _>(
                &format!("/reclamations/{complaint_id}/statut"),
                &StatusUpdate { status },
            )
            .await?
            .into_result()
    }

    // =========================================================================
    // Operator incident reports
    // =========================================================================

    /// Every incident report (admin view).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn all_reports(&self) -> Result<Vec<IncidentReport>> {
        self.api
            .get::<Envelope<Vec<IncidentReport>>>("/signalements")
            .await?
            .into_result()
    }

    /// File an incident report about a print job.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, input))]
    pub async fn file_report(&self, input: &IncidentReportInput) -> Result<IncidentReport> {
        self.api
            .post::<Envelope<IncidentReport>, _>("/signalements", input)
            .await?
            .into_result()
    }

    /// Transition an incident report's status (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self), fields(report_id = %report_id, status = ?status))]
    pub async fn set_report_status(
        &self,
        report_id: IncidentReportId,
        status: ComplaintStatus,
    ) -> Result<IncidentReport> {
        self.api
            .put::<Envelope<IncidentReport>, _>(
                &format!("/signalements/{report_id}/statut"),
                &StatusUpdate { status },
            )
            .await?
            .into_result()
    }
}
