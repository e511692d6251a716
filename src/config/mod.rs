use crate::core::{AppError, Currency, Result};
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub notification: NotificationConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub default_currency: Currency,
    pub notify_on_order_created: bool,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// Razorpay credentials. `key_secret` doubles as the completion signature key.
#[derive(Clone)]
pub struct GatewayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Operator notification delivery. Both credentials are optional; without them
/// the dispatcher runs disabled.
#[derive(Clone)]
pub struct NotificationConfig {
    pub api_key: Option<String>,
    pub admin_email: Option<String>,
    pub from_address: String,
    pub base_url: String,
    pub store_name: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("admin_email", &self.admin_email)
            .field("from_address", &self.from_address)
            .field("base_url", &self.base_url)
            .field("store_name", &self.store_name)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl NotificationConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some() && self.admin_email.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub rate_limit_per_minute: u32,
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required_var(name: &str) -> Result<String> {
    optional_var(name).ok_or_else(|| AppError::Configuration(format!("{} not set", name)))
}

fn parse_var<T: std::str::FromStr>(name: &str, default: &str) -> Result<T> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", name)))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let default_currency = env::var("DEFAULT_CURRENCY")
            .unwrap_or_else(|_| "INR".to_string())
            .parse::<Currency>()
            .map_err(AppError::Configuration)?;

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                default_currency,
                notify_on_order_created: parse_var("NOTIFY_ON_ORDER_CREATED", "false")?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            gateway: GatewayConfig {
                key_id: required_var("RAZORPAY_KEY_ID")?,
                key_secret: required_var("RAZORPAY_KEY_SECRET")?,
                base_url: env::var("RAZORPAY_BASE_URL")
                    .unwrap_or_else(|_| "https://api.razorpay.com".to_string()),
                timeout_secs: parse_var("RAZORPAY_TIMEOUT_SECS", "15")?,
            },
            notification: NotificationConfig {
                api_key: optional_var("RESEND_API_KEY"),
                admin_email: optional_var("ADMIN_EMAIL"),
                from_address: env::var("NOTIFICATION_FROM")
                    .unwrap_or_else(|_| "Orders <orders@resend.dev>".to_string()),
                base_url: env::var("RESEND_BASE_URL")
                    .unwrap_or_else(|_| "https://api.resend.com".to_string()),
                store_name: env::var("STORE_NAME").unwrap_or_else(|_| "Storefront".to_string()),
                timeout_secs: parse_var("NOTIFICATION_TIMEOUT_SECS", "10")?,
            },
            security: SecurityConfig {
                rate_limit_per_minute: parse_var("RATE_LIMIT_PER_MINUTE", "120")?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.gateway.key_id.trim().is_empty() || self.gateway.key_secret.trim().is_empty() {
            return Err(AppError::Configuration(
                "Razorpay credentials must not be empty".to_string(),
            ));
        }

        if self.gateway.timeout_secs == 0 {
            return Err(AppError::Configuration(
                "Gateway timeout must be greater than 0".to_string(),
            ));
        }

        if self.notification.timeout_secs == 0 {
            return Err(AppError::Configuration(
                "Notification timeout must be greater than 0".to_string(),
            ));
        }

        if self.security.rate_limit_per_minute == 0 {
            return Err(AppError::Configuration(
                "Rate limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
