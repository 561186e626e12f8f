// foodtruck/src/config.rs

use crate::errors::{AppError, Result};
use chrono::{Duration, FixedOffset, Offset, Utc};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentProviderKind {
  Square,
  Mock,
}

impl FromStr for PaymentProviderKind {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "square" => Ok(Self::Square),
      "mock" => Ok(Self::Mock),
      other => Err(AppError::Config(format!("Unknown PAYMENT_PROVIDER '{}'", other))),
    }
  }
}

#[derive(Clone)]
pub struct SquareConfig {
  pub access_token: String,
  pub location_id: String,
  pub api_url: String,
  pub api_version: String,
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs the service on the in-process store.
  pub database_url: Option<String>,

  pub payment_provider: PaymentProviderKind,
  pub square: SquareConfig,
  pub webhook_signature_key: Option<String>,

  pub admin_password_hash: Option<String>,
  pub admin_session_ttl: Duration,

  /// Wall-clock offset of the truck's business day, used for "today" and "now".
  pub business_utc_offset: FixedOffset,
  pub orphan_order_grace: Duration,
  pub reconcile_interval_secs: u64,

  pub seed_db: bool,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      payment_provider: PaymentProviderKind::Mock,
      square: SquareConfig {
        access_token: String::new(),
        location_id: String::new(),
        api_url: "https://connect.squareupsandbox.com".to_string(),
        api_version: "2024-01-18".to_string(),
      },
      webhook_signature_key: None,
      admin_password_hash: None,
      admin_session_ttl: Duration::minutes(480),
      business_utc_offset: FixedOffset::west_opt(5 * 3600).unwrap_or_else(|| Utc.fix()),
      orphan_order_grace: Duration::minutes(30),
      reconcile_interval_secs: 300,
      seed_db: false,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    let defaults = Self::default();

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());
    fn parse<T: FromStr>(var_name: &str, raw: Option<String>, default: T) -> Result<T>
    where
      T::Err: std::fmt::Display,
    {
      match raw {
        Some(value) => value
          .trim()
          .parse::<T>()
          .map_err(|e| AppError::Config(format!("Invalid {}: {}", var_name, e))),
        None => Ok(default),
      }
    }

    let server_host = get_env("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = parse("SERVER_PORT", get_env("SERVER_PORT"), defaults.server_port)?;
    let database_url = get_env("DATABASE_URL");

    let square = SquareConfig {
      access_token: get_env("SQUARE_ACCESS_TOKEN").unwrap_or_default(),
      location_id: get_env("SQUARE_LOCATION_ID").unwrap_or_default(),
      api_url: get_env("SQUARE_API_URL").unwrap_or(defaults.square.api_url),
      api_version: get_env("SQUARE_API_VERSION").unwrap_or(defaults.square.api_version),
    };

    let default_provider = if square.access_token.is_empty() {
      PaymentProviderKind::Mock
    } else {
      PaymentProviderKind::Square
    };
    let payment_provider = parse("PAYMENT_PROVIDER", get_env("PAYMENT_PROVIDER"), default_provider)?;
    if payment_provider == PaymentProviderKind::Square
      && (square.access_token.is_empty() || square.location_id.is_empty())
    {
      return Err(AppError::Config(
        "PAYMENT_PROVIDER=square requires SQUARE_ACCESS_TOKEN and SQUARE_LOCATION_ID".to_string(),
      ));
    }

    let offset_hours: i32 = parse("BUSINESS_UTC_OFFSET_HOURS", get_env("BUSINESS_UTC_OFFSET_HOURS"), -5)?;
    let business_utc_offset = FixedOffset::east_opt(offset_hours * 3600)
      .ok_or_else(|| AppError::Config(format!("BUSINESS_UTC_OFFSET_HOURS out of range: {}", offset_hours)))?;

    let session_minutes: i64 = parse("ADMIN_SESSION_TTL_MINUTES", get_env("ADMIN_SESSION_TTL_MINUTES"), 480)?;
    let grace_minutes: i64 = parse("ORPHAN_ORDER_GRACE_MINUTES", get_env("ORPHAN_ORDER_GRACE_MINUTES"), 30)?;

    let config = Self {
      server_host,
      server_port,
      database_url,
      payment_provider,
      square,
      webhook_signature_key: get_env("SQUARE_WEBHOOK_SIGNATURE_KEY"),
      admin_password_hash: get_env("ADMIN_PASSWORD_HASH"),
      admin_session_ttl: Duration::minutes(session_minutes),
      business_utc_offset,
      orphan_order_grace: Duration::minutes(grace_minutes),
      reconcile_interval_secs: parse(
        "RECONCILE_INTERVAL_SECS",
        get_env("RECONCILE_INTERVAL_SECS"),
        defaults.reconcile_interval_secs,
      )?,
      seed_db: parse("SEED_DB", get_env("SEED_DB"), false)?,
    };

    if config.webhook_signature_key.is_none() {
      tracing::warn!("SQUARE_WEBHOOK_SIGNATURE_KEY is not set; webhooks will be rejected.");
    }
    if config.admin_password_hash.is_none() {
      tracing::warn!("ADMIN_PASSWORD_HASH is not set; admin login is disabled.");
    }
    tracing::info!(
      provider = ?config.payment_provider,
      persistent_store = config.database_url.is_some(),
      "Application configuration loaded successfully."
    );
    Ok(config)
  }
}
