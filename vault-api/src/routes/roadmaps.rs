//! Curated study roadmaps
//!
//! Reading is public for published roadmaps; moderators see unpublished
//! ones too. Creation is a moderator action, editing is open to any
//! authenticated user, deletion stays with the creator or an admin.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, patch, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use validator::Validate;

use vault_core::{Page, PageParams, DEFAULT_RESOURCE_LIMIT};
use vault_db::entities::RoadmapEntity;

use crate::auth::middleware::{optional_auth, require_auth};
use crate::auth::tokens::AuthClaims;
use crate::dto::{CreateRoadmapRequest, ListQuery, RoadmapResponse, UpdateRoadmapRequest};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list))
        .route("/:id", get(get_one))
        .route("/subject/:code", get(by_subject))
        .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    let protected = Router::new()
        .route("/", post(create))
        .route("/:id", patch(update).delete(delete_one))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}

async fn list(
    State(state): State<AppState>,
    claims: Option<Extension<AuthClaims>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<RoadmapResponse>>> {
    let public_only = !claims.is_some_and(|Extension(c)| c.role.can_moderate());
    let params = PageParams::clamp(query.page, query.limit, DEFAULT_RESOURCE_LIMIT);

    let (items, total) = state.db.roadmaps.list(public_only, params).await?;
    let page = Page::new(items, params, total);
    Ok(Json(page.map(|m| RoadmapResponse::from(&m))))
}

async fn get_one(
    State(state): State<AppState>,
    claims: Option<Extension<AuthClaims>>,
    Path(roadmap_id): Path<String>,
) -> ApiResult<Json<RoadmapResponse>> {
    let roadmap = fetch(&state, &roadmap_id).await?;

    if !roadmap.is_public {
        let visible = claims.is_some_and(|Extension(c)| {
            c.role.can_moderate() || c.user_id() == roadmap.created_by
        });
        if !visible {
            return Err(ApiError::NotFound(format!(
                "Roadmap {roadmap_id} not found"
            )));
        }
    }
    Ok(Json(RoadmapResponse::from(&roadmap)))
}

async fn by_subject(
    State(state): State<AppState>,
    claims: Option<Extension<AuthClaims>>,
    Path(code): Path<String>,
) -> ApiResult<Json<Vec<RoadmapResponse>>> {
    let subject = state
        .db
        .catalog
        .subject_by_code(&code)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Subject {code} not found")))?;

    let public_only = !claims.is_some_and(|Extension(c)| c.role.can_moderate());
    let roadmaps = state
        .db
        .roadmaps
        .by_subject(&subject.subject_id, public_only)
        .await?;
    Ok(Json(roadmaps.iter().map(RoadmapResponse::from).collect()))
}

async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(req): Json<CreateRoadmapRequest>,
) -> ApiResult<(StatusCode, Json<RoadmapResponse>)> {
    if !claims.role.can_moderate() {
        return Err(ApiError::Forbidden("moderator role required".to_string()));
    }
    req.validate()?;

    let subject = state
        .db
        .catalog
        .subject_by_code(&req.subject_code)
        .await?
        .ok_or_else(|| {
            ApiError::Validation(format!("Subject {} not found", req.subject_code))
        })?;

    let entity = RoadmapEntity::new(
        subject.subject_id,
        req.kind,
        req.title,
        req.description,
        req.difficulty,
        req.steps.into_iter().map(|s| s.into_step()).collect(),
        claims.user_id().to_string(),
        req.is_public,
        req.tags,
    );
    let roadmap = state.db.roadmaps.create(&entity).await?;
    Ok((StatusCode::CREATED, Json(RoadmapResponse::from(&roadmap))))
}

async fn update(
    State(state): State<AppState>,
    Path(roadmap_id): Path<String>,
    Json(req): Json<UpdateRoadmapRequest>,
) -> ApiResult<Json<RoadmapResponse>> {
    req.validate()?;

    let mut roadmap = fetch(&state, &roadmap_id).await?;

    if let Some(title) = req.title {
        roadmap.title = title;
    }
    if let Some(description) = req.description {
        roadmap.description = description;
    }
    if let Some(difficulty) = req.difficulty {
        roadmap.difficulty = difficulty;
    }
    if let Some(steps) = req.steps {
        roadmap.steps = steps.into_iter().map(|s| s.into_step()).collect();
        roadmap.total_estimated_hours = roadmap.steps.iter().map(|s| s.estimated_hours).sum();
    }
    if let Some(is_public) = req.is_public {
        roadmap.is_public = is_public;
    }
    if let Some(tags) = req.tags {
        roadmap.tags = tags;
    }
    roadmap.updated_at = Utc::now();

    state.db.roadmaps.update(&roadmap).await?;
    Ok(Json(RoadmapResponse::from(&roadmap)))
}

async fn delete_one(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(roadmap_id): Path<String>,
) -> ApiResult<StatusCode> {
    let roadmap = fetch(&state, &roadmap_id).await?;
    if roadmap.created_by != claims.user_id() && !claims.role.is_admin() {
        return Err(ApiError::Forbidden(
            "only the creator or an admin may delete a roadmap".to_string(),
        ));
    }

    state.db.roadmaps.delete(&roadmap_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch(state: &AppState, roadmap_id: &str) -> ApiResult<RoadmapEntity> {
    state
        .db
        .roadmaps
        .get(roadmap_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Roadmap {roadmap_id} not found")))
}
