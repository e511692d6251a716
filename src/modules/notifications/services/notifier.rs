use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::NotificationConfig;
use crate::core::{AppError, Result};
use crate::modules::notifications::models::OrderSummary;

/// External delivery channel for operator notifications
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn send(&self, summary: &OrderSummary) -> Result<()>;

    fn name(&self) -> &str;
}

/// Transactional email delivery through the Resend API
pub struct ResendNotifier {
    client: Client,
    api_key: String,
    admin_email: String,
    from_address: String,
    base_url: String,
    store_name: String,
}

impl ResendNotifier {
    /// Fails with a configuration error when the API key or admin address is missing
    pub fn new(config: &NotificationConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::configuration("RESEND_API_KEY not set"))?;
        let admin_email = config
            .admin_email
            .clone()
            .ok_or_else(|| AppError::configuration("ADMIN_EMAIL not set"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            admin_email,
            from_address: config.from_address.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store_name: config.store_name.clone(),
        })
    }

    fn build_email(&self, summary: &OrderSummary) -> ResendEmail {
        ResendEmail {
            from: self.from_address.clone(),
            to: vec![self.admin_email.clone()],
            subject: summary.subject(),
            text: summary.render_text(&self.store_name),
        }
    }
}

#[async_trait]
impl OrderNotifier for ResendNotifier {
    async fn send(&self, summary: &OrderSummary) -> Result<()> {
        let url = format!("{}/emails", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_email(summary))
            .send()
            .await
            .map_err(|e| AppError::notification(format!("Resend request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::notification(format!(
                "Resend API error - HTTP {} ({})",
                status.as_u16(),
                body
            )));
        }

        let sent: ResendEmailResponse = response
            .json()
            .await
            .map_err(|e| AppError::notification(format!("Failed to parse Resend response: {}", e)))?;

        tracing::debug!(
            ledger_order_id = %summary.order_id,
            email_id = %sent.id,
            "Order notification email accepted"
        );

        Ok(())
    }

    fn name(&self) -> &str {
        "resend"
    }
}

#[derive(Debug, Serialize)]
struct ResendEmail {
    from: String,
    to: Vec<String>,
    subject: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ResendEmailResponse {
    id: String,
}
