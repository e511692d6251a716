// Service graph and route table shared by the binary and the HTTP tests.

use std::sync::Arc;

use actix_web::web;

use crate::config::Config;
use crate::core::Result;
use crate::middleware::{configure_extractors, RateLimiter};
use crate::modules::gateways::PaymentGateway;
use crate::modules::health;
use crate::modules::notifications::{NotificationDispatcher, OrderNotifier};
use crate::modules::orders::{self, OrderIntentService, OrderQueryService, OrderRepository};
use crate::modules::payments::{self, PaymentCompletionService, SignatureVerifier};

/// Fully wired services, cheap to clone into each worker
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub intents: Arc<OrderIntentService>,
    pub completions: Arc<PaymentCompletionService>,
    pub queries: Arc<OrderQueryService>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Wire services from explicit collaborators. No ambient lookups happen
    /// past this point; a missing gateway secret fails here, before serving.
    pub fn new(
        config: &Config,
        orders: Arc<dyn OrderRepository>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Option<Arc<dyn OrderNotifier>>,
    ) -> Result<Self> {
        let notifications = match notifier {
            Some(notifier) => NotificationDispatcher::new(notifier),
            None => NotificationDispatcher::disabled(),
        };

        let verifier = SignatureVerifier::new(config.gateway.key_secret.clone())?;

        let intents = OrderIntentService::new(
            gateway,
            orders.clone(),
            notifications.clone(),
            config.app.default_currency,
            config.app.notify_on_order_created,
        );
        let completions = PaymentCompletionService::new(verifier, orders.clone(), notifications);
        let queries = OrderQueryService::new(orders.clone());

        Ok(Self {
            orders,
            intents: Arc::new(intents),
            completions: Arc::new(completions),
            queries: Arc::new(queries),
            rate_limiter: RateLimiter::new(config.security.rate_limit_per_minute),
        })
    }

    /// Register shared data and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.orders.clone()))
            .app_data(web::Data::new(self.intents.clone()))
            .app_data(web::Data::new(self.completions.clone()))
            .app_data(web::Data::new(self.queries.clone()))
            .configure(configure_extractors)
            .configure(health::controllers::configure)
            .configure(orders::controllers::configure);

        let limiter = self.rate_limiter.clone();
        cfg.configure(|cfg| payments::controllers::configure(cfg, limiter));
    }
}
