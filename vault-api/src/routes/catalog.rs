//! Public catalog reads
//!
//! The hierarchy is browsed level by level, or fetched whole via
//! `/structure`. Writes live under `/admin`.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use vault_core::types::CatalogStructure;

use crate::dto::{
    BranchResponse, ProgramResponse, SemesterResponse, SubjectResponse, YearResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/branches", get(list_branches))
        .route("/branches/:id/programs", get(list_programs))
        .route("/programs/:id/years", get(list_years))
        .route("/years/:id/semesters", get(list_semesters))
        .route("/semesters/:id/subjects", get(list_subjects))
        .route("/subjects", get(all_subjects))
        .route("/subjects/:code", get(subject_by_code))
        .route("/structure", get(structure))
}

async fn list_branches(State(state): State<AppState>) -> ApiResult<Json<Vec<BranchResponse>>> {
    let branches = state.db.catalog.branches().await?;
    Ok(Json(branches.iter().map(BranchResponse::from).collect()))
}

async fn list_programs(
    State(state): State<AppState>,
    Path(branch_id): Path<String>,
) -> ApiResult<Json<Vec<ProgramResponse>>> {
    state
        .db
        .catalog
        .branch_by_id(&branch_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Branch {branch_id} not found")))?;
    let programs = state.db.catalog.programs_of(&branch_id).await?;
    Ok(Json(programs.iter().map(ProgramResponse::from).collect()))
}

async fn list_years(
    State(state): State<AppState>,
    Path(program_id): Path<String>,
) -> ApiResult<Json<Vec<YearResponse>>> {
    state
        .db
        .catalog
        .program_by_id(&program_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Program {program_id} not found")))?;
    let years = state.db.catalog.years_of(&program_id).await?;
    Ok(Json(years.iter().map(YearResponse::from).collect()))
}

async fn list_semesters(
    State(state): State<AppState>,
    Path(year_id): Path<String>,
) -> ApiResult<Json<Vec<SemesterResponse>>> {
    state
        .db
        .catalog
        .year_by_id(&year_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Year {year_id} not found")))?;
    let semesters = state.db.catalog.semesters_of(&year_id).await?;
    Ok(Json(semesters.iter().map(SemesterResponse::from).collect()))
}

async fn list_subjects(
    State(state): State<AppState>,
    Path(semester_id): Path<String>,
) -> ApiResult<Json<Vec<SubjectResponse>>> {
    state
        .db
        .catalog
        .semester_by_id(&semester_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Semester {semester_id} not found")))?;
    let subjects = state.db.catalog.subjects_of(&semester_id).await?;
    Ok(Json(subjects.iter().map(SubjectResponse::from).collect()))
}

async fn all_subjects(State(state): State<AppState>) -> ApiResult<Json<Vec<SubjectResponse>>> {
    let subjects = state.db.catalog.subjects().await?;
    Ok(Json(subjects.iter().map(SubjectResponse::from).collect()))
}

async fn subject_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<SubjectResponse>> {
    let subject = state
        .db
        .catalog
        .subject_by_code(&code)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Subject {code} not found")))?;
    Ok(Json(SubjectResponse::from(&subject)))
}

async fn structure(State(state): State<AppState>) -> ApiResult<Json<CatalogStructure>> {
    Ok(Json(state.catalog.structure().await?))
}
