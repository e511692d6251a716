use super::gateway_trait::{GatewayOrder, GatewayOrderRequest, PaymentGateway};
use crate::config::GatewayConfig;
use crate::core::{AppError, Currency, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Razorpay payment gateway client
///
/// Implements PaymentGateway for the Razorpay Orders API.
/// API Documentation: https://razorpay.com/docs/api/orders/
pub struct RazorpayClient {
    client: Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl RazorpayClient {
    /// Create a new Razorpay client
    ///
    /// # Arguments
    /// * `config` - Gateway credentials, base URL and request timeout
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        if config.key_id.trim().is_empty() || config.key_secret.trim().is_empty() {
            return Err(AppError::configuration("Razorpay credentials not configured"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder> {
        let url = format!("{}/v1/orders", self.base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    AppError::gateway(format!(
                        "Razorpay gateway unavailable: {}",
                        if e.is_timeout() {
                            "timeout"
                        } else {
                            "connection failed"
                        }
                    ))
                } else {
                    AppError::gateway(format!("Razorpay API request failed: {}", e))
                }
            })?;

        let status_code = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| AppError::gateway(format!("Failed to read Razorpay response: {}", e)))?;

        if !status_code.is_success() {
            tracing::error!(
                status = status_code.as_u16(),
                body = %response_body,
                "Razorpay rejected order creation"
            );
            return Err(AppError::gateway(format!(
                "Razorpay API error - HTTP {}",
                status_code.as_u16()
            )));
        }

        let razorpay_order: RazorpayOrderResponse = serde_json::from_str(&response_body)
            .map_err(|e| AppError::gateway(format!("Failed to parse Razorpay response: {}", e)))?;

        if razorpay_order.id.trim().is_empty() {
            return Err(AppError::gateway("Razorpay returned an order without an id"));
        }

        let currency = razorpay_order
            .currency
            .parse::<Currency>()
            .map_err(|e| AppError::gateway(format!("Unexpected Razorpay currency: {}", e)))?;

        Ok(GatewayOrder {
            id: razorpay_order.id,
            amount: razorpay_order.amount,
            currency,
            receipt: razorpay_order.receipt,
            status: razorpay_order.status,
        })
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn name(&self) -> &str {
        "razorpay"
    }
}

// Razorpay API response structures

#[derive(Debug, Deserialize)]
struct RazorpayOrderResponse {
    id: String,
    amount: i64,
    currency: String,
    #[serde(default)]
    receipt: Option<String>,
    #[serde(default)]
    status: Option<String>,
}
