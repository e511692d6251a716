use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::core::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex HMAC-SHA256 of `"{gateway_order_id}|{gateway_payment_id}"` keyed by `secret`
pub fn compute_payment_signature(
    gateway_order_id: &str,
    gateway_payment_id: &str,
    secret: &str,
) -> Result<String> {
    if secret.is_empty() {
        return Err(AppError::configuration("Payment signature secret not configured"));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::configuration(format!("Invalid signature secret: {}", e)))?;
    mac.update(gateway_order_id.as_bytes());
    mac.update(b"|");
    mac.update(gateway_payment_id.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a completion callback signature.
///
/// A mismatch is `Ok(false)`. Only a missing secret is an error. The comparison
/// is exact (case and length sensitive) and constant time.
pub fn verify_payment_signature(
    gateway_order_id: &str,
    gateway_payment_id: &str,
    claimed_signature: &str,
    secret: &str,
) -> Result<bool> {
    let expected = compute_payment_signature(gateway_order_id, gateway_payment_id, secret)?;

    Ok(expected
        .as_bytes()
        .ct_eq(claimed_signature.as_bytes())
        .into())
}

/// Verifier bound to the process-wide gateway secret
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AppError::configuration("Payment signature secret not configured"));
        }
        Ok(Self { secret })
    }

    pub fn verify(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        claimed_signature: &str,
    ) -> Result<bool> {
        verify_payment_signature(
            gateway_order_id,
            gateway_payment_id,
            claimed_signature,
            &self.secret,
        )
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"<redacted>")
            .finish()
    }
}
