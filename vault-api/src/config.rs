//! API server configuration
//!
//! Secrets and the datastore endpoint are required; everything else has a
//! sensible default. TTLs accept `90s`, `15m`, `12h`, `7d`.

use std::env;
use std::time::Duration;

use vault_core::{VaultError, VaultResult};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_namespace: String,
    pub db_name: String,
    pub jwt_access_secret: String,
    pub jwt_refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Exact allowed origin; `None` means permissive CORS.
    pub cors_origin: Option<String>,
    pub cookie_secure: bool,
}

impl ApiConfig {
    /// Load from the environment. Fails fast on missing secrets.
    pub fn from_env() -> VaultResult<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: optional("PORT", 4000)?,
            database_url: required("DATABASE_URL")?,
            db_namespace: env::var("DB_NAMESPACE").unwrap_or_else(|_| "vault".to_string()),
            db_name: env::var("DB_NAME").unwrap_or_else(|_| "vault".to_string()),
            jwt_access_secret: required("JWT_ACCESS_SECRET")?,
            jwt_refresh_secret: required("JWT_REFRESH_SECRET")?,
            access_ttl: ttl("ACCESS_TOKEN_TTL", Duration::from_secs(15 * 60))?,
            refresh_ttl: ttl("REFRESH_TOKEN_TTL", Duration::from_secs(7 * 24 * 3600))?,
            cors_origin: env::var("CORS_ORIGIN").ok(),
            cookie_secure: optional("COOKIE_SECURE", false)?,
        })
    }
}

fn required(key: &str) -> VaultResult<String> {
    env::var(key).map_err(|_| {
        VaultError::Internal(format!("required environment variable {key} is not set"))
    })
}

fn optional<T: std::str::FromStr>(key: &str, default: T) -> VaultResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| VaultError::Internal(format!("invalid value for {key}: {raw}"))),
        Err(_) => Ok(default),
    }
}

fn ttl(key: &str, default: Duration) -> VaultResult<Duration> {
    match env::var(key) {
        Ok(raw) => parse_ttl(&raw)
            .ok_or_else(|| VaultError::Internal(format!("invalid duration for {key}: {raw}"))),
        Err(_) => Ok(default),
    }
}

/// Parse `<number><unit>` durations with s/m/h/d units. Bare numbers are
/// seconds.
fn parse_ttl(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => raw.split_at(idx),
        None => (raw, "s"),
    };
    let n: u64 = digits.parse().ok()?;
    let secs = match unit {
        "s" => n,
        "m" => n * 60,
        "h" => n * 3600,
        "d" => n * 86_400,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_units() {
        assert_eq!(parse_ttl("15m"), Some(Duration::from_secs(900)));
        assert_eq!(parse_ttl("7d"), Some(Duration::from_secs(604_800)));
        assert_eq!(parse_ttl("90"), Some(Duration::from_secs(90)));
        assert_eq!(parse_ttl("3w"), None);
        assert_eq!(parse_ttl("fast"), None);
    }
}
