// foodtruck/src/services/webhook_auth.rs

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::errors::{AppError, Result as AppResult};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-square-signature";

/// base64(HMAC-SHA256(key, body)), the value the provider puts in the signature header.
pub fn sign(key: &str, body: &[u8]) -> AppResult<String> {
  let mut mac = HmacSha256::new_from_slice(key.as_bytes())
    .map_err(|e| AppError::Config(format!("Invalid webhook signature key: {}", e)))?;
  mac.update(body);
  Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Checks `signature` against the body in constant time.
pub fn verify_signature(key: Option<&str>, signature: Option<&str>, body: &[u8]) -> AppResult<()> {
  let signature = signature
    .filter(|s| !s.is_empty())
    .ok_or_else(|| AppError::Auth("Missing Square signature".to_string()))?;
  let key = key.ok_or_else(|| AppError::Auth("Webhook signature key not configured".to_string()))?;

  let expected = STANDARD
    .decode(signature.trim())
    .map_err(|_| AppError::Auth("Invalid signature".to_string()))?;
  let mut mac = HmacSha256::new_from_slice(key.as_bytes())
    .map_err(|e| AppError::Config(format!("Invalid webhook signature key: {}", e)))?;
  mac.update(body);
  mac
    .verify_slice(&expected)
    .map_err(|_| AppError::Auth("Invalid signature".to_string()))
}

/// Hex SHA-256 of the body; dedupe key for events without an `event_id`.
pub fn body_digest(body: &[u8]) -> String {
  Sha256::digest(body).iter().map(|b| format!("{:02x}", b)).collect()
}
