//! Payment and checkout service.
//!
//! Card tokenization and confirmation belong to the payment provider's
//! client SDK. This service only creates the payment intent and, once the
//! provider has confirmed it, places the backend order. A failed card
//! confirmation therefore never reaches order creation: [`PaymentConfirmation`]
//! is the only way into [`PaymentService::place_order`], and it is built from
//! a confirmed intent id.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use printastic_core::{OrderId, ProductId};

use crate::cart::Cart;
use crate::error::Result;
use crate::http::{ApiClient, Envelope};

/// A payment intent created by the backend against the payment provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Provider-side intent identifier.
    pub id: String,
    /// Secret handed to the provider's client SDK for card confirmation.
    pub client_secret: String,
}

impl PaymentIntent {
    /// Mark this intent as confirmed by the payment provider.
    ///
    /// Call only after the provider's SDK reported a successful card
    /// confirmation for this intent.
    #[must_use]
    pub fn confirmed(self) -> PaymentConfirmation {
        PaymentConfirmation { intent_id: self.id }
    }
}

/// Proof that the payment provider confirmed an intent.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    intent_id: String,
}

impl PaymentConfirmation {
    /// The confirmed intent id.
    #[must_use]
    pub fn intent_id(&self) -> &str {
        &self.intent_id
    }
}

#[derive(Serialize)]
struct CreateIntentRequest {
    /// Amount in the smallest currency unit.
    amount: i64,
    currency: String,
}

#[derive(Serialize)]
struct OrderLineRequest {
    #[serde(rename = "produitId")]
    product_id: ProductId,
    #[serde(rename = "quantite")]
    quantity: u32,
}

#[derive(Serialize)]
struct PlaceOrderRequest {
    #[serde(rename = "paymentIntentId")]
    payment_intent_id: String,
    #[serde(rename = "lignes")]
    lines: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
struct PlacedOrder {
    id: OrderId,
}

/// Service for `/stripe` and order placement.
#[derive(Clone)]
pub struct PaymentService {
    api: ApiClient,
}

impl PaymentService {
    pub(crate) const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Create a payment intent for the given amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self))]
    pub async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent> {
        self.api
            .post::<Envelope<PaymentIntent>, _>(
                "/stripe/create-payment-intent",
                &CreateIntentRequest {
                    amount: amount_cents,
                    currency: currency.to_string(),
                },
            )
            .await?
            .into_result()
    }

    /// Place the order for the current cart contents.
    ///
    /// Only callable with a [`PaymentConfirmation`], so the order-creation
    /// call can never precede a successful card confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected; the attempt is
    /// then terminal and checkout must be restarted.
    #[instrument(skip(self, confirmation, cart))]
    pub async fn place_order(
        &self,
        confirmation: &PaymentConfirmation,
        cart: &Cart,
    ) -> Result<OrderId> {
        let request = PlaceOrderRequest {
            payment_intent_id: confirmation.intent_id().to_string(),
            lines: cart
                .lines()
                .iter()
                .map(|line| OrderLineRequest {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
        };

        let placed = self
            .api
            .post::<Envelope<PlacedOrder>, _>("/commandes", &request)
            .await?
            .into_result()?;

        Ok(placed.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_carries_intent_id() {
        let intent = PaymentIntent {
            id: "pi_123".to_string(),
            client_secret: "pi_123_secret".to_string(),
        };
        let confirmation = intent.confirmed();
        assert_eq!(confirmation.intent_id(), "pi_123");
    }
}
