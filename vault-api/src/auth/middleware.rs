//! Auth middleware
//!
//! Tokens arrive either in the `access_token` HTTP-only cookie or as an
//! `Authorization: Bearer` header; the cookie wins when both are present.
//! Valid claims are inserted as a request extension for handlers to read.

use axum::{
    extract::{Request, State},
    http::header::{AUTHORIZATION, COOKIE},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

use super::tokens::AuthClaims;

/// Cookie names for the token pair
pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Reject the request unless a valid access token is presented.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&req)
        .ok_or_else(|| ApiError::Unauthorized("missing access token".to_string()))?;
    let claims = state.tokens.verify_access(&token)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Attach claims when a valid access token is present; otherwise continue
/// anonymously. Used by public reads whose scope widens for privileged
/// callers.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(&req) {
        if let Ok(claims) = state.tokens.verify_access(&token) {
            req.extensions_mut().insert(claims);
        }
    }
    next.run(req).await
}

/// Admin gate; layered after [`require_auth`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let claims = req
        .extensions()
        .get::<AuthClaims>()
        .ok_or_else(|| ApiError::Unauthorized("missing access token".to_string()))?;
    if !claims.role.is_admin() {
        return Err(ApiError::Forbidden("admin role required".to_string()));
    }
    Ok(next.run(req).await)
}

fn extract_token(req: &Request) -> Option<String> {
    if let Some(token) = cookie_value(req, ACCESS_COOKIE) {
        return Some(token);
    }
    bearer_token(req)
}

fn cookie_value(req: &Request, name: &str) -> Option<String> {
    let header = req.headers().get(COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

/// Read the refresh token from its cookie, for the refresh endpoint's
/// body-less form.
pub fn refresh_cookie(req_headers: &axum::http::HeaderMap) -> Option<String> {
    let header = req_headers.get(COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == REFRESH_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

fn bearer_token(req: &Request) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}
