use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::RateLimiter;
use crate::modules::payments::models::{VerifyPaymentRequest, VerifyPaymentResponse};
use crate::modules::payments::services::PaymentCompletionService;

/// Verify a relayed completion callback and mark the order paid
/// POST /api/payments/verify
pub async fn verify_payment(
    service: web::Data<Arc<PaymentCompletionService>>,
    request: web::Json<VerifyPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let order = service.complete_payment(request.into()).await?;

    Ok(HttpResponse::Ok().json(VerifyPaymentResponse::new(order)))
}

/// Configure payment routes behind the shared rate limiter
pub fn configure(cfg: &mut web::ServiceConfig, limiter: RateLimiter) {
    cfg.service(
        web::scope("/api/payments")
            .wrap(limiter)
            .route("/verify", web::post().to(verify_payment)),
    );
}
