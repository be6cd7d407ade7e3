//! Admin surface: catalog writes, moderation queues, role management
//!
//! Every route here sits behind the auth middleware plus the admin gate.
//! Catalog creates check the parent row exists so the hierarchy cannot
//! grow dangling references.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use validator::Validate;

use vault_core::{Page, PageParams, DEFAULT_RESOURCE_LIMIT};
use vault_db::entities::{
    BranchEntity, ProgramEntity, SemesterEntity, SubjectEntity, YearEntity,
};

use crate::auth::middleware::{require_admin, require_auth};
use crate::dto::{
    BranchResponse, CreateBranchRequest, CreateProgramRequest, CreateSemesterRequest,
    CreateSubjectRequest, CreateYearRequest, ListQuery, ProgramResponse, ResourceResponse,
    RoadmapResponse, SemesterResponse, SubjectResponse, UpdateRoleRequest, UserResponse,
    YearResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/branches", post(create_branch))
        .route("/branches/:id", put(update_branch).delete(delete_branch))
        .route("/programs", post(create_program))
        .route("/programs/:id", put(update_program).delete(delete_program))
        .route("/years", post(create_year))
        .route("/years/:id", put(update_year).delete(delete_year))
        .route("/semesters", post(create_semester))
        .route("/semesters/:id", put(update_semester).delete(delete_semester))
        .route("/subjects", post(create_subject))
        .route("/subjects/:id", put(update_subject).delete(delete_subject))
        .route("/resources/pending", get(pending_resources))
        .route("/roadmaps/pending", get(pending_roadmaps))
        .route("/users/:id/role", patch(update_role))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

async fn create_branch(
    State(state): State<AppState>,
    Json(req): Json<CreateBranchRequest>,
) -> ApiResult<(StatusCode, Json<BranchResponse>)> {
    req.validate()?;
    let entity = BranchEntity::new(req.code.to_uppercase(), req.name);
    let branch = state.db.catalog.create_branch(&entity).await?;
    Ok((StatusCode::CREATED, Json(BranchResponse::from(&branch))))
}

async fn update_branch(
    State(state): State<AppState>,
    Path(branch_id): Path<String>,
    Json(req): Json<CreateBranchRequest>,
) -> ApiResult<Json<BranchResponse>> {
    req.validate()?;
    let mut branch = state
        .db
        .catalog
        .branch_by_id(&branch_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Branch {branch_id} not found")))?;
    branch.code = req.code.to_uppercase();
    branch.name = req.name;
    state.db.catalog.update_branch(&branch).await?;
    Ok(Json(BranchResponse::from(&branch)))
}

async fn delete_branch(
    State(state): State<AppState>,
    Path(branch_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.catalog.delete_branch(&branch_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Programs
// ---------------------------------------------------------------------------

async fn create_program(
    State(state): State<AppState>,
    Json(req): Json<CreateProgramRequest>,
) -> ApiResult<(StatusCode, Json<ProgramResponse>)> {
    req.validate()?;
    state
        .db
        .catalog
        .branch_by_id(&req.branch_id)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("Branch {} not found", req.branch_id)))?;
    let entity = ProgramEntity::new(req.branch_id, req.name, req.duration_years);
    let program = state.db.catalog.create_program(&entity).await?;
    Ok((StatusCode::CREATED, Json(ProgramResponse::from(&program))))
}

async fn update_program(
    State(state): State<AppState>,
    Path(program_id): Path<String>,
    Json(req): Json<CreateProgramRequest>,
) -> ApiResult<Json<ProgramResponse>> {
    req.validate()?;
    let mut program = state
        .db
        .catalog
        .program_by_id(&program_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Program {program_id} not found")))?;
    state
        .db
        .catalog
        .branch_by_id(&req.branch_id)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("Branch {} not found", req.branch_id)))?;
    program.branch_id = req.branch_id;
    program.name = req.name;
    program.duration_years = req.duration_years;
    state.db.catalog.update_program(&program).await?;
    Ok(Json(ProgramResponse::from(&program)))
}

async fn delete_program(
    State(state): State<AppState>,
    Path(program_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.catalog.delete_program(&program_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Years
// ---------------------------------------------------------------------------

async fn create_year(
    State(state): State<AppState>,
    Json(req): Json<CreateYearRequest>,
) -> ApiResult<(StatusCode, Json<YearResponse>)> {
    req.validate()?;
    state
        .db
        .catalog
        .program_by_id(&req.program_id)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("Program {} not found", req.program_id)))?;
    let entity = YearEntity::new(req.program_id, req.year_number);
    let year = state.db.catalog.create_year(&entity).await?;
    Ok((StatusCode::CREATED, Json(YearResponse::from(&year))))
}

async fn update_year(
    State(state): State<AppState>,
    Path(year_id): Path<String>,
    Json(req): Json<CreateYearRequest>,
) -> ApiResult<Json<YearResponse>> {
    req.validate()?;
    let mut year = state
        .db
        .catalog
        .year_by_id(&year_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Year {year_id} not found")))?;
    state
        .db
        .catalog
        .program_by_id(&req.program_id)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("Program {} not found", req.program_id)))?;
    year.program_id = req.program_id;
    year.year_number = req.year_number;
    state.db.catalog.update_year(&year).await?;
    Ok(Json(YearResponse::from(&year)))
}

async fn delete_year(
    State(state): State<AppState>,
    Path(year_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.catalog.delete_year(&year_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Semesters
// ---------------------------------------------------------------------------

async fn create_semester(
    State(state): State<AppState>,
    Json(req): Json<CreateSemesterRequest>,
) -> ApiResult<(StatusCode, Json<SemesterResponse>)> {
    req.validate()?;
    state
        .db
        .catalog
        .year_by_id(&req.year_id)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("Year {} not found", req.year_id)))?;
    let entity = SemesterEntity::new(req.year_id, req.semester_number);
    let semester = state.db.catalog.create_semester(&entity).await?;
    Ok((StatusCode::CREATED, Json(SemesterResponse::from(&semester))))
}

async fn update_semester(
    State(state): State<AppState>,
    Path(semester_id): Path<String>,
    Json(req): Json<CreateSemesterRequest>,
) -> ApiResult<Json<SemesterResponse>> {
    req.validate()?;
    let mut semester = state
        .db
        .catalog
        .semester_by_id(&semester_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Semester {semester_id} not found")))?;
    state
        .db
        .catalog
        .year_by_id(&req.year_id)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("Year {} not found", req.year_id)))?;
    semester.year_id = req.year_id;
    semester.semester_number = req.semester_number;
    state.db.catalog.update_semester(&semester).await?;
    Ok(Json(SemesterResponse::from(&semester)))
}

async fn delete_semester(
    State(state): State<AppState>,
    Path(semester_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.catalog.delete_semester(&semester_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Subjects
// ---------------------------------------------------------------------------

async fn create_subject(
    State(state): State<AppState>,
    Json(req): Json<CreateSubjectRequest>,
) -> ApiResult<(StatusCode, Json<SubjectResponse>)> {
    req.validate()?;
    state
        .db
        .catalog
        .branch_by_id(&req.branch_id)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("Branch {} not found", req.branch_id)))?;
    state
        .db
        .catalog
        .semester_by_id(&req.semester_id)
        .await?
        .ok_or_else(|| {
            ApiError::Validation(format!("Semester {} not found", req.semester_id))
        })?;
    let entity = SubjectEntity::new(
        req.code.to_uppercase(),
        req.name,
        req.branch_id,
        req.semester_id,
        req.credits,
        req.topics,
    );
    let subject = state.db.catalog.create_subject(&entity).await?;
    Ok((StatusCode::CREATED, Json(SubjectResponse::from(&subject))))
}

async fn update_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Json(req): Json<CreateSubjectRequest>,
) -> ApiResult<Json<SubjectResponse>> {
    req.validate()?;
    let mut subject = state
        .db
        .catalog
        .subject_by_id(&subject_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Subject {subject_id} not found")))?;
    state
        .db
        .catalog
        .branch_by_id(&req.branch_id)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("Branch {} not found", req.branch_id)))?;
    state
        .db
        .catalog
        .semester_by_id(&req.semester_id)
        .await?
        .ok_or_else(|| {
            ApiError::Validation(format!("Semester {} not found", req.semester_id))
        })?;
    subject.code = req.code.to_uppercase();
    subject.name = req.name;
    subject.branch_id = req.branch_id;
    subject.semester_id = req.semester_id;
    subject.credits = req.credits;
    subject.topics = req.topics;
    state.db.catalog.update_subject(&subject).await?;
    Ok(Json(SubjectResponse::from(&subject)))
}

async fn delete_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.catalog.delete_subject(&subject_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Moderation queues and roles
// ---------------------------------------------------------------------------

async fn pending_resources(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<ResourceResponse>>> {
    let params = PageParams::clamp(query.page, query.limit, DEFAULT_RESOURCE_LIMIT);
    let (items, total) = state.db.resources.pending(params).await?;
    let page = Page::new(items, params, total);
    Ok(Json(page.map(|r| ResourceResponse::from(&r))))
}

async fn pending_roadmaps(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<RoadmapResponse>>> {
    let params = PageParams::clamp(query.page, query.limit, DEFAULT_RESOURCE_LIMIT);
    let (items, total) = state.db.roadmaps.pending(params).await?;
    let page = Page::new(items, params, total);
    Ok(Json(page.map(|m| RoadmapResponse::from(&m))))
}

async fn update_role(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<UserResponse>> {
    state
        .db
        .users
        .by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {user_id} not found")))?;
    state.db.users.set_role(&user_id, req.role).await?;
    let user = state
        .db
        .users
        .by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {user_id} not found")))?;
    Ok(Json(UserResponse::from(&user)))
}
