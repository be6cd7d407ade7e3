//! Registration, login and the token lifecycle
//!
//! Successful register/login/refresh set the token pair as HTTP-only
//! cookies and also return it in the body for clients that prefer a Bearer
//! header. Logout clears the cookies; it does not revoke anything
//! server-side.

use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use uuid::Uuid;
use validator::Validate;

use vault_db::entities::UserEntity;

use crate::auth::middleware::{require_auth, refresh_cookie, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::tokens::{AuthClaims, TokenPair};
use crate::dto::{
    AuthResponse, LoginRequest, MessageResponse, RefreshRequest, RegisterRequest,
    ResendVerificationRequest, UserResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/verify-email/:token", get(verify_email))
        .route("/resend-verification", post(resend_verification))
        .merge(protected)
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, HeaderMap, Json<AuthResponse>)> {
    req.validate()?;

    let display_name = req
        .display_name
        .clone()
        .unwrap_or_else(|| req.username.clone());
    let entity = UserEntity::new(
        req.username,
        req.email,
        display_name,
        hash_password(&req.password)?,
        Uuid::new_v4().simple().to_string(),
    );
    // Unique indexes turn duplicate usernames/emails into a 409.
    let user = state.db.users.create(&entity).await?;

    if let Some(token) = user.verification_token.as_deref() {
        // Delivery failure must not lose the account.
        if let Err(e) = state.mailer.send_verification(&user.email, token) {
            tracing::warn!(email = %user.email, error = %e, "verification mail failed");
        }
    }

    let pair = state.tokens.issue_pair(&user.user_id, &user.display_name, user.role)?;
    let headers = cookie_headers(&state, &pair)?;
    Ok((
        StatusCode::CREATED,
        headers,
        Json(AuthResponse {
            user: UserResponse::from(&user),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(HeaderMap, Json<AuthResponse>)> {
    req.validate()?;

    // Same error for unknown email and bad password.
    let user = state
        .db
        .users
        .by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".to_string()))?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("invalid credentials".to_string()));
    }

    let pair = state.tokens.issue_pair(&user.user_id, &user.display_name, user.role)?;
    let headers = cookie_headers(&state, &pair)?;
    Ok((
        headers,
        Json(AuthResponse {
            user: UserResponse::from(&user),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }),
    ))
}

/// Rotate the token pair. The refresh token comes from the request body or,
/// failing that, the refresh cookie. Claims are re-read from the user row
/// so a role change takes effect here.
async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> ApiResult<(HeaderMap, Json<AuthResponse>)> {
    let token = body
        .and_then(|Json(req)| req.refresh_token)
        .or_else(|| refresh_cookie(&headers))
        .ok_or_else(|| ApiError::Unauthorized("missing refresh token".to_string()))?;
    let claims = state.tokens.verify_refresh(&token)?;

    let user = state
        .db
        .users
        .by_id(claims.user_id())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("account no longer exists".to_string()))?;

    let pair = state.tokens.issue_pair(&user.user_id, &user.display_name, user.role)?;
    let headers = cookie_headers(&state, &pair)?;
    Ok((
        headers,
        Json(AuthResponse {
            user: UserResponse::from(&user),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }),
    ))
}

async fn logout(State(state): State<AppState>) -> ApiResult<(HeaderMap, Json<MessageResponse>)> {
    let mut headers = HeaderMap::new();
    for name in [ACCESS_COOKIE, REFRESH_COOKIE] {
        headers.append(
            SET_COOKIE,
            cookie_line(name, "", 0, state.cookie_secure)?,
        );
    }
    Ok((headers, Json(MessageResponse::new("logged out"))))
}

async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .db
        .users
        .by_id(claims.user_id())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("account no longer exists".to_string()))?;
    Ok(Json(UserResponse::from(&user)))
}

async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let user = state
        .db
        .users
        .by_verification_token(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("verification token not found".to_string()))?;
    state.db.users.mark_verified(&user.user_id).await?;
    Ok(Json(MessageResponse::new("email verified")))
}

/// Always answers with the same message so the endpoint cannot be used to
/// probe which emails have accounts.
async fn resend_verification(
    State(state): State<AppState>,
    Json(req): Json<ResendVerificationRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    if let Some(user) = state.db.users.by_email(&req.email).await? {
        if !user.is_verified {
            let token = Uuid::new_v4().simple().to_string();
            state.db.users.set_verification_token(&user.user_id, &token).await?;
            if let Err(e) = state.mailer.send_verification(&user.email, &token) {
                tracing::warn!(email = %user.email, error = %e, "verification mail failed");
            }
        }
    }
    Ok(Json(MessageResponse::new(
        "if the account exists, a verification mail was sent",
    )))
}

fn cookie_headers(state: &AppState, pair: &TokenPair) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.append(
        SET_COOKIE,
        cookie_line(
            ACCESS_COOKIE,
            &pair.access_token,
            state.tokens.access_ttl.as_secs(),
            state.cookie_secure,
        )?,
    );
    headers.append(
        SET_COOKIE,
        cookie_line(
            REFRESH_COOKIE,
            &pair.refresh_token,
            state.tokens.refresh_ttl.as_secs(),
            state.cookie_secure,
        )?,
    );
    Ok(headers)
}

fn cookie_line(name: &str, value: &str, max_age: u64, secure: bool) -> ApiResult<HeaderValue> {
    let mut line = format!("{name}={value}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age}");
    if secure {
        line.push_str("; Secure");
    }
    HeaderValue::from_str(&line)
        .map_err(|e| ApiError::Internal(format!("cookie header: {e}")))
}
