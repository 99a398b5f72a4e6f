//! Webhook signature verification.
//!
//! Inbound webhooks carry a hex-encoded HMAC-SHA256 of the raw request body
//! in the `X-Webhook-Signature` header. Verification runs over the exact
//! bytes received, before any JSON parsing, and uses a constant-time
//! comparison.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Signature verification errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The signature is not 64 hex characters.
    #[error("signature is not a hex-encoded HMAC-SHA256")]
    InvalidFormat,
    /// The signature does not match the payload.
    #[error("signature mismatch")]
    Mismatch,
}

/// Computes the hex-encoded HMAC-SHA256 of a payload.
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a webhook signature against the raw payload bytes.
///
/// The signature must be the raw lowercase or uppercase hex encoding of the
/// HMAC; no provider prefix formats are accepted.
///
/// # Errors
///
/// Returns `SignatureError::InvalidFormat` for anything that is not 64 hex
/// characters, `SignatureError::Mismatch` when verification fails.
pub fn verify_signature(
    payload: &[u8],
    signature: &str,
    secret: &str,
) -> Result<(), SignatureError> {
    let signature = signature.trim();
    if signature.len() != 64 || !signature.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SignatureError::InvalidFormat);
    }

    let expected = sign(payload, secret);
    if timing_safe_eq(&signature.to_ascii_lowercase(), &expected) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Timing-safe string comparison to prevent timing attacks.
fn timing_safe_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.as_bytes().iter().zip(b.as_bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}
