//! Rating submission, listing and moderation
//!
//! One rating per user per resource; a repeat submission overwrites the
//! stars and review. Every mutation here funnels through the rating
//! service so the resource aggregate stays in step.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};
use validator::Validate;

use vault_core::{Page, PageParams, DEFAULT_RATING_LIMIT};

use crate::auth::middleware::require_auth;
use crate::auth::tokens::AuthClaims;
use crate::dto::{ListQuery, RatingResponse, SubmitRatingRequest};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/resource/:resource_id", post(submit))
        .route("/resource/:resource_id/:rating_id", delete(delete_one))
        .route("/:rating_id/helpful", post(mark_helpful))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/resource/:resource_id", get(list))
        .merge(protected)
}

async fn list(
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<RatingResponse>>> {
    let params = PageParams::clamp(query.page, query.limit, DEFAULT_RATING_LIMIT);
    let page = state.ratings.list_for_resource(&resource_id, params).await?;
    Ok(Json(page.map(|r| RatingResponse::from(&r))))
}

async fn submit(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(resource_id): Path<String>,
    Json(req): Json<SubmitRatingRequest>,
) -> ApiResult<(StatusCode, Json<RatingResponse>)> {
    req.validate()?;

    // 201 for a first rating, 200 when it replaces an earlier one.
    let existing = state
        .db
        .ratings
        .find_pair(&resource_id, claims.user_id())
        .await?;
    let status = if existing.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    let rated = state
        .ratings
        .submit(&resource_id, claims.user_id(), req.rating, req.review)
        .await?;
    Ok((status, Json(RatingResponse::from(&rated))))
}

async fn delete_one(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path((resource_id, rating_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let rating = state
        .db
        .ratings
        .get(&rating_id)
        .await?
        .filter(|r| r.resource_id == resource_id)
        .ok_or_else(|| ApiError::NotFound(format!("Rating {rating_id} not found")))?;

    if rating.user_id != claims.user_id() && !claims.role.is_admin() {
        return Err(ApiError::Forbidden(
            "only the author or an admin may delete a rating".to_string(),
        ));
    }

    state.ratings.delete(&rating).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_helpful(
    State(state): State<AppState>,
    Path(rating_id): Path<String>,
) -> ApiResult<Json<RatingResponse>> {
    let rating = state.ratings.mark_helpful(&rating_id).await?;
    Ok(Json(RatingResponse::without_author(&rating)))
}
