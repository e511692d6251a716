use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::orders::models::{CreateOrderRequest, CreateOrderResponse, OrderStatusResponse};
use crate::modules::orders::services::{OrderIntentService, OrderQueryService};

/// Create a gateway intent and its pending ledger order
/// POST /api/orders
pub async fn create_order(
    service: web::Data<Arc<OrderIntentService>>,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let intent = service.create_intent(request.into()).await?;

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        success: true,
        gateway_order_id: intent.gateway_order_id,
        ledger_order_id: intent.ledger_order_id,
        api_key_id: intent.api_key_id,
        amount: intent.amount_subunits,
        currency: intent.currency,
    }))
}

/// Status-only lookup by ledger id; customer details are never returned
/// GET /api/orders/{id}
pub async fn get_order_status(
    service: web::Data<Arc<OrderQueryService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order = service.get_order(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(OrderStatusResponse::new(order)))
}

/// Configure order routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/orders")
            .route("", web::post().to(create_order))
            .route("/{id}", web::get().to(get_order_status)),
    );
}
