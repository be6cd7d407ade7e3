//! Resource CRUD, listing and moderation
//!
//! Listing is public but the anonymous view only ever sees approved rows;
//! `includeUnapproved` and `mine` widen the view for moderators and owners.
//! Unapproved resources are a 404 for anyone other than their owner or a
//! moderator, so their existence does not leak.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, patch, post, put};
use axum::{Extension, Json, Router};
use chrono::Utc;
use validator::Validate;

use vault_core::{Page, PageParams, DEFAULT_RESOURCE_LIMIT};
use vault_db::entities::ResourceEntity;
use vault_db::ResourceFilter;

use crate::auth::middleware::{optional_auth, require_auth};
use crate::auth::tokens::AuthClaims;
use crate::dto::{
    ApproveRequest, CreateResourceRequest, ListResourcesQuery, ResourceResponse,
    UpdateResourceRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list))
        .route("/:id", get(get_one))
        .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    let protected = Router::new()
        .route("/", post(create))
        .route("/:id", put(update).delete(delete_one))
        .route("/:id/approve", patch(approve))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}

async fn list(
    State(state): State<AppState>,
    claims: Option<Extension<AuthClaims>>,
    Query(query): Query<ListResourcesQuery>,
) -> ApiResult<Json<Page<ResourceResponse>>> {
    let claims = claims.map(|Extension(c)| c);

    let added_by = if query.mine {
        let c = claims
            .as_ref()
            .ok_or_else(|| ApiError::Unauthorized("mine requires authentication".to_string()))?;
        Some(c.user_id().to_string())
    } else {
        None
    };
    // Silently ignored for everyone else.
    let include_unapproved = query.include_unapproved
        && claims.as_ref().is_some_and(|c| c.role.can_moderate());

    let filter = ResourceFilter {
        q: query.q,
        kind: query.kind,
        branch_code: query.branch,
        semester_number: query.semester,
        subject_id: query.subject,
        sort: query.sort,
        include_unapproved,
        added_by,
    };
    let params = PageParams::clamp(query.page, query.limit, DEFAULT_RESOURCE_LIMIT);

    let page = state.resource_query.list(&filter, params).await?;
    Ok(Json(page.map(|r| ResourceResponse::from(&r))))
}

async fn get_one(
    State(state): State<AppState>,
    claims: Option<Extension<AuthClaims>>,
    Path(resource_id): Path<String>,
) -> ApiResult<Json<ResourceResponse>> {
    let resource = fetch(&state, &resource_id).await?;

    if !resource.is_approved {
        let visible = claims.is_some_and(|Extension(c)| {
            c.role.can_moderate() || c.user_id() == resource.added_by
        });
        if !visible {
            return Err(ApiError::NotFound(format!(
                "Resource {resource_id} not found"
            )));
        }
    }
    Ok(Json(ResourceResponse::from(&resource)))
}

async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Json(req): Json<CreateResourceRequest>,
) -> ApiResult<(StatusCode, Json<ResourceResponse>)> {
    req.validate()?;

    state
        .db
        .catalog
        .subject_by_id(&req.subject_id)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("Subject {} not found", req.subject_id)))?;

    let entity = ResourceEntity::new(
        req.kind,
        req.title,
        req.url,
        req.description,
        req.provider,
        req.subject_id,
        req.topics,
        req.tags,
        req.prerequisites,
        claims.user_id().to_string(),
    );
    let resource = state.db.resources.create(&entity).await?;
    Ok((StatusCode::CREATED, Json(ResourceResponse::from(&resource))))
}

async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(resource_id): Path<String>,
    Json(req): Json<UpdateResourceRequest>,
) -> ApiResult<Json<ResourceResponse>> {
    req.validate()?;

    let mut resource = fetch(&state, &resource_id).await?;
    if resource.added_by != claims.user_id() && !claims.role.can_moderate() {
        return Err(ApiError::Forbidden(
            "only the contributor or a moderator may edit a resource".to_string(),
        ));
    }

    if let Some(kind) = req.kind {
        resource.kind = kind;
    }
    if let Some(title) = req.title {
        resource.title = title;
    }
    if let Some(url) = req.url {
        resource.url = url;
    }
    if let Some(description) = req.description {
        resource.description = description;
    }
    if let Some(provider) = req.provider {
        resource.provider = provider;
    }
    if let Some(topics) = req.topics {
        resource.topics = topics;
    }
    if let Some(tags) = req.tags {
        resource.tags = tags;
    }
    if let Some(prerequisites) = req.prerequisites {
        resource.prerequisites = prerequisites;
    }
    resource.updated_at = Utc::now();

    state.db.resources.update(&resource).await?;
    Ok(Json(ResourceResponse::from(&resource)))
}

/// Removing a resource also removes its ratings; they have nothing left to
/// aggregate into.
async fn delete_one(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(resource_id): Path<String>,
) -> ApiResult<StatusCode> {
    let resource = fetch(&state, &resource_id).await?;
    if resource.added_by != claims.user_id() && !claims.role.can_moderate() {
        return Err(ApiError::Forbidden(
            "only the contributor or a moderator may delete a resource".to_string(),
        ));
    }

    state.db.resources.delete(&resource_id).await?;
    state.db.ratings.delete_for_resource(&resource_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn approve(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(resource_id): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> ApiResult<Json<ResourceResponse>> {
    if !claims.role.can_moderate() {
        return Err(ApiError::Forbidden("moderator role required".to_string()));
    }

    fetch(&state, &resource_id).await?;
    state.db.resources.set_approved(&resource_id, req.approved).await?;
    let resource = fetch(&state, &resource_id).await?;
    Ok(Json(ResourceResponse::from(&resource)))
}

async fn fetch(state: &AppState, resource_id: &str) -> ApiResult<ResourceEntity> {
    state
        .db
        .resources
        .get(resource_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Resource {resource_id} not found")))
}
