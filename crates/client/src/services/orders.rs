//! Customer order service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use printastic_core::{OrderId, OrderLineId, OrderLineStatus, Price};

use crate::error::Result;
use crate::http::{ApiClient, Envelope};

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "quantite")]
    pub quantity: u32,
    #[serde(rename = "prixUnitaire")]
    pub unit_price: Price,
    #[serde(rename = "statut")]
    pub status: OrderLineStatus,
}

/// A placed order with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(rename = "passeeLe")]
    pub placed_at: DateTime<Utc>,
    #[serde(rename = "lignes")]
    pub lines: Vec<OrderLine>,
}

#[derive(Serialize)]
struct StatusUpdate {
    #[serde(rename = "statut")]
    status: OrderLineStatus,
}

/// Service for `/commandes`.
#[derive(Clone)]
pub struct OrderService {
    api: ApiClient,
}

impl OrderService {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// The calling customer's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>> {
        self.api
            .get::<Envelope<Vec<Order>>>("/commandes/mes-commandes")
            .await?
            .into_result()
    }

    /// Transition the status of one order line.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is rejected or the request fails.
    #[instrument(skip(self), fields(line_id = %line_id, status = ?status))]
    pub async fn set_line_status(
        &self,
        line_id: OrderLineId,
        status: OrderLineStatus,
    ) -> Result<OrderLine> {
        self.api
            .put::<Envelope<OrderLine>, _>(
                &format!("/commandes/detail/{line_id}/statut"),
                &StatusUpdate { status },
            )
            .await?
            .into_result()
    }
}
