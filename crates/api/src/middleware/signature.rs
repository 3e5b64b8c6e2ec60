//! # Webhook Signature Verification
//!
//! Webhook senders sign the raw request body with HMAC-SHA256 using the
//! shared secret and send the result as `X-Signature-256: sha256=<hex>`,
//! the same scheme GitHub uses for its webhooks.

use hmac::{Hmac, Mac};
use medley_core::errors::{MedleyError, MedleyResult};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature
pub const SIGNATURE_HEADER: &str = "x-signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

fn new_mac(secret: &str) -> MedleyResult<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| MedleyError::Internal(format!("Invalid webhook secret: {}", e).into()))
}

/// Computes the signature header value for `body`.
///
/// # Example
///
/// ```
/// use medley_api::middleware::signature::{sign, verify_signature};
///
/// let header = sign("s3cret", b"{}").unwrap();
/// assert!(header.starts_with("sha256="));
/// assert!(verify_signature("s3cret", &header, b"{}").is_ok());
/// ```
pub fn sign(secret: &str, body: &[u8]) -> MedleyResult<String> {
    let mut mac = new_mac(secret)?;
    mac.update(body);
    Ok(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Checks a signature header against `body`.
///
/// The comparison is constant time.
///
/// # Errors
///
/// Returns `MedleyError::Authentication` when the header is malformed or
/// does not match.
pub fn verify_signature(secret: &str, header: &str, body: &[u8]) -> MedleyResult<()> {
    let encoded = header
        .trim()
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or_else(|| MedleyError::Authentication("Unsupported signature format".to_string()))?;

    let expected = hex::decode(encoded)
        .map_err(|_| MedleyError::Authentication("Malformed signature".to_string()))?;

    let mut mac = new_mac(secret)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| MedleyError::Authentication("Signature mismatch".to_string()))
}
