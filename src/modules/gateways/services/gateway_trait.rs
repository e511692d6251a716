use crate::core::{Currency, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Payment gateway used to allocate payment intents
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a gateway-side order for the given subunit amount
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder>;

    /// Public key identifier handed to the client checkout widget
    fn key_id(&self) -> &str;

    /// Get gateway name
    fn name(&self) -> &str;
}

/// Outbound order creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrderRequest {
    /// Amount in the smallest currency unit
    pub amount: i64,

    pub currency: Currency,

    /// Per-attempt receipt token
    pub receipt: String,

    /// Free-form notes attached to the gateway order
    pub notes: GatewayOrderNotes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayOrderNotes {
    pub user_email: String,
    pub user_id: String,
}

/// Gateway order as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// Gateway order id, e.g. `order_A1`
    pub id: String,

    pub amount: i64,

    pub currency: Currency,

    #[serde(default)]
    pub receipt: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}
