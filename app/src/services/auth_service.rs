// foodtruck/src/services/auth_service.rs

//! Admin authentication: Argon2 password check and server-side sessions.

use crate::errors::AppError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand_core::RngCore;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};

/// Hashes a password with Argon2. Used to produce `ADMIN_PASSWORD_HASH`.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty for hashing.".to_string()));
  }
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| {
      error!(error = %e, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", e))
    })
}

/// Verifies a password against a stored Argon2 hash. A mismatch is `Ok(false)`.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(hashed_password: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Err(AppError::Auth("Password is required.".to_string()));
  }
  let parsed_hash = PasswordHash::new(hashed_password).map_err(|e| {
    error!(error = %e, "Failed to parse stored password hash string.");
    AppError::Config(format!("Invalid ADMIN_PASSWORD_HASH: {}", e))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: passwords do not match.");
      Ok(false)
    }
    Err(e) => Err(AppError::Internal(format!("Password verification process failed: {}", e))),
  }
}

#[derive(Debug, Clone, Copy)]
struct Session {
  expires_at: DateTime<Utc>,
}

/// Bearer tokens issued on admin login, valid until their TTL runs out.
pub struct AdminSessions {
  ttl: Duration,
  sessions: RwLock<HashMap<String, Session>>,
}

impl AdminSessions {
  pub fn new(ttl: Duration) -> Self {
    Self {
      ttl,
      sessions: RwLock::new(HashMap::new()),
    }
  }

  /// Issues a fresh 256-bit token.
  pub fn issue(&self, now: DateTime<Utc>) -> (String, DateTime<Utc>) {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    let expires_at = now + self.ttl;

    let mut sessions = self.sessions.write();
    sessions.retain(|_, s| s.expires_at > now);
    sessions.insert(token.clone(), Session { expires_at });
    info!(active_sessions = sessions.len(), "Admin session issued.");
    (token, expires_at)
  }

  pub fn validate(&self, token: &str, now: DateTime<Utc>) -> bool {
    self
      .sessions
      .read()
      .get(token)
      .is_some_and(|s| s.expires_at > now)
  }

  pub fn revoke(&self, token: &str) -> bool {
    self.sessions.write().remove(token).is_some()
  }
}
