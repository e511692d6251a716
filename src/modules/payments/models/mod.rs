pub mod verify_payment;

pub use verify_payment::{VerifyPaymentRequest, VerifyPaymentResponse};
