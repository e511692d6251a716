use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orderpay::config::Config;
use orderpay::gateways::{PaymentGateway, RazorpayClient};
use orderpay::middleware::RequestId;
use orderpay::notifications::{OrderNotifier, ResendNotifier};
use orderpay::orders::{MySqlOrderRepository, OrderRepository};
use orderpay::AppState;

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("orderpay={},actix_web=info,sqlx=warn", config.app.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.app.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(&config);

    tracing::info!(
        env = %config.app.env,
        bind_address = %config.server.bind_address(),
        default_currency = %config.app.default_currency,
        "Starting order payment service"
    );

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        max_connections = config.database.max_connections,
        "Database pool initialized"
    );

    let orders: Arc<dyn OrderRepository> = Arc::new(MySqlOrderRepository::new(db_pool));
    let gateway: Arc<dyn PaymentGateway> = Arc::new(
        RazorpayClient::new(&config.gateway).context("Failed to configure payment gateway")?,
    );

    let notifier: Option<Arc<dyn OrderNotifier>> = if config.notification.is_enabled() {
        let notifier = ResendNotifier::new(&config.notification)
            .context("Failed to configure notification delivery")?;
        Some(Arc::new(notifier))
    } else {
        tracing::warn!("RESEND_API_KEY or ADMIN_EMAIL not set, order notifications disabled");
        None
    };

    let state = AppState::new(&config, orders, gateway, notifier)
        .context("Failed to wire application services")?;

    let bind_address = config.server.bind_address();
    let allowed_origins = config.server.cors_allowed_origins.clone();

    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(build_cors(&allowed_origins))
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await.context("HTTP server terminated with an error")
}
