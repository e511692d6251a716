pub mod payment_completion_service;
pub mod signature_verifier;

pub use payment_completion_service::{CompletePaymentCommand, PaymentCompletionService};
pub use signature_verifier::{compute_payment_signature, verify_payment_signature, SignatureVerifier};
