// Payments module: completion callback verification and the paid transition

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{VerifyPaymentRequest, VerifyPaymentResponse};
pub use services::{
    compute_payment_signature, verify_payment_signature, CompletePaymentCommand,
    PaymentCompletionService, SignatureVerifier,
};
