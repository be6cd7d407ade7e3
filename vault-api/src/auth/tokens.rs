//! JWT access/refresh token pairs
//!
//! Two HS256 tokens with separate secrets: a short-lived access token and a
//! longer-lived refresh token. The `token_use` claim keeps one from being
//! replayed as the other even if the secrets were ever set equal.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use vault_core::types::Role;

use crate::error::{ApiError, ApiResult};

/// Which half of the pair a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject: user id
    pub sub: String,
    /// Display name, echoed into responses without a user lookup
    pub name: String,
    pub role: Role,
    pub token_use: TokenUse,
    pub exp: i64,
    pub iat: i64,
}

impl AuthClaims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Access + refresh token pair as handed to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signing/verification keys and TTLs
#[derive(Clone)]
pub struct TokenKeys {
    access_secret: String,
    refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenKeys {
    pub fn new(
        access_secret: String,
        refresh_secret: String,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a fresh pair for a user.
    pub fn issue_pair(&self, user_id: &str, name: &str, role: Role) -> ApiResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue(user_id, name, role, TokenUse::Access)?,
            refresh_token: self.issue(user_id, name, role, TokenUse::Refresh)?,
        })
    }

    fn issue(&self, user_id: &str, name: &str, role: Role, token_use: TokenUse) -> ApiResult<String> {
        let (secret, ttl) = match token_use {
            TokenUse::Access => (&self.access_secret, self.access_ttl),
            TokenUse::Refresh => (&self.refresh_secret, self.refresh_ttl),
        };
        let now = Utc::now().timestamp();
        let claims = AuthClaims {
            sub: user_id.to_string(),
            name: name.to_string(),
            role,
            token_use,
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
    }

    pub fn verify_access(&self, token: &str) -> ApiResult<AuthClaims> {
        self.verify(token, &self.access_secret, TokenUse::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> ApiResult<AuthClaims> {
        self.verify(token, &self.refresh_secret, TokenUse::Refresh)
    }

    fn verify(&self, token: &str, secret: &str, expected: TokenUse) -> ApiResult<AuthClaims> {
        let data = decode::<AuthClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ApiError::Unauthorized("token expired".to_string())
            }
            _ => ApiError::Unauthorized("invalid token".to_string()),
        })?;
        if data.claims.token_use != expected {
            return Err(ApiError::Unauthorized("wrong token type".to_string()));
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new(
            "access-secret-for-tests-0123456789ab".into(),
            "refresh-secret-for-tests-0123456789a".into(),
            Duration::from_secs(900),
            Duration::from_secs(604_800),
        )
    }

    #[test]
    fn pair_round_trips() {
        let keys = keys();
        let pair = keys.issue_pair("usr_1", "Alice", Role::Moderator).unwrap();

        let claims = keys.verify_access(&pair.access_token).unwrap();
        assert_eq!(claims.sub, "usr_1");
        assert_eq!(claims.role, Role::Moderator);

        let claims = keys.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(claims.token_use, TokenUse::Refresh);
    }

    #[test]
    fn tokens_do_not_cross_over() {
        let keys = keys();
        let pair = keys.issue_pair("usr_1", "Alice", Role::User).unwrap();

        assert!(keys.verify_access(&pair.refresh_token).is_err());
        assert!(keys.verify_refresh(&pair.access_token).is_err());
        assert!(keys.verify_access("not-a-jwt").is_err());
    }
}
