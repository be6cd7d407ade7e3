//! Data Transfer Objects
//!
//! Request structs carry `validator` derives; enum-typed fields (resource
//! type, sort key, roadmap kind, difficulty, role) make their allow-lists
//! part of deserialization, so out-of-range values are rejected before any
//! handler runs. Responses use camelCase wire casing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use vault_core::types::{
    Difficulty, RatingDistribution, ResourceKind, RoadmapKind, Role, SortKey, MAX_STEP_HOURS,
    MIN_STEP_HOURS,
};
use vault_db::entities::{
    BranchEntity, ProgramEntity, RatingEntity, ResourceEntity, RoadmapEntity, RoadmapStep,
    SemesterEntity, SubjectEntity, UserEntity, YearEntity,
};
use vault_db::RatedBy;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Optional; the refresh cookie is used when absent.
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResendVerificationRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub is_verified: bool,
}

impl From<&UserEntity> for UserResponse {
    fn from(u: &UserEntity) -> Self {
        Self {
            user_id: u.user_id.clone(),
            username: u.username.clone(),
            email: u.email.clone(),
            display_name: u.display_name.clone(),
            role: u.role,
            is_verified: u.is_verified,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBranchRequest {
    #[validate(length(min = 2, max = 10))]
    pub code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramRequest {
    pub branch_id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1, max = 8))]
    pub duration_years: u8,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateYearRequest {
    pub program_id: String,
    #[validate(range(min = 1, max = 8))]
    pub year_number: u8,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSemesterRequest {
    pub year_id: String,
    #[validate(range(min = 1, max = 16))]
    pub semester_number: u8,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    #[validate(length(min = 2, max = 20))]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub branch_id: String,
    pub semester_id: String,
    #[validate(range(min = 0, max = 20))]
    pub credits: u8,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchResponse {
    pub branch_id: String,
    pub code: String,
    pub name: String,
}

impl From<&BranchEntity> for BranchResponse {
    fn from(b: &BranchEntity) -> Self {
        Self {
            branch_id: b.branch_id.clone(),
            code: b.code.clone(),
            name: b.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramResponse {
    pub program_id: String,
    pub branch_id: String,
    pub name: String,
    pub duration_years: u8,
}

impl From<&ProgramEntity> for ProgramResponse {
    fn from(p: &ProgramEntity) -> Self {
        Self {
            program_id: p.program_id.clone(),
            branch_id: p.branch_id.clone(),
            name: p.name.clone(),
            duration_years: p.duration_years,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResponse {
    pub year_id: String,
    pub program_id: String,
    pub year_number: u8,
}

impl From<&YearEntity> for YearResponse {
    fn from(y: &YearEntity) -> Self {
        Self {
            year_id: y.year_id.clone(),
            program_id: y.program_id.clone(),
            year_number: y.year_number,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterResponse {
    pub semester_id: String,
    pub year_id: String,
    pub semester_number: u8,
}

impl From<&SemesterEntity> for SemesterResponse {
    fn from(s: &SemesterEntity) -> Self {
        Self {
            semester_id: s.semester_id.clone(),
            year_id: s.year_id.clone(),
            semester_number: s.semester_number,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    pub subject_id: String,
    pub code: String,
    pub name: String,
    pub branch_id: String,
    pub semester_id: String,
    pub credits: u8,
    pub topics: Vec<String>,
}

impl From<&SubjectEntity> for SubjectResponse {
    fn from(s: &SubjectEntity) -> Self {
        Self {
            subject_id: s.subject_id.clone(),
            code: s.code.clone(),
            name: s.name.clone(),
            branch_id: s.branch_id.clone(),
            semester_id: s.semester_id.clone(),
            credits: s.credits,
            topics: s.topics.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRequest {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(url)]
    pub url: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub provider: String,
    pub subject_id: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceRequest {
    #[serde(rename = "type")]
    pub kind: Option<ResourceKind>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub provider: Option<String>,
    pub topics: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub prerequisites: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub approved: bool,
}

/// Query string for `GET /resources`. Unknown `sort` or `type` values fail
/// deserialization, which is the allow-list enforcement point.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResourcesQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ResourceKind>,
    pub branch: Option<String>,
    pub semester: Option<u8>,
    pub subject: Option<String>,
    pub sort: Option<SortKey>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Moderator/admin only; silently ignored otherwise.
    #[serde(default)]
    pub include_unapproved: bool,
    /// Restrict to the caller's own submissions.
    #[serde(default)]
    pub mine: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub resource_id: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub title: String,
    pub url: String,
    pub description: String,
    pub provider: String,
    pub subject_id: String,
    pub topics: Vec<String>,
    pub tags: Vec<String>,
    pub prerequisites: Vec<String>,
    pub added_by: String,
    pub is_approved: bool,
    pub quality_score: u8,
    pub average_rating: f64,
    pub total_ratings: u64,
    pub rating_distribution: RatingDistribution,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ResourceEntity> for ResourceResponse {
    fn from(r: &ResourceEntity) -> Self {
        Self {
            resource_id: r.resource_id.clone(),
            kind: r.kind,
            title: r.title.clone(),
            url: r.url.clone(),
            description: r.description.clone(),
            provider: r.provider.clone(),
            subject_id: r.subject_id.clone(),
            topics: r.topics.clone(),
            tags: r.tags.clone(),
            prerequisites: r.prerequisites.clone(),
            added_by: r.added_by.clone(),
            is_approved: r.is_approved,
            quality_score: r.quality_score,
            average_rating: r.average_rating,
            total_ratings: r.total_ratings,
            rating_distribution: r.rating_distribution,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRatingRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(max = 1000))]
    pub review: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub rating_id: String,
    pub resource_id: String,
    pub user_id: String,
    pub author_name: String,
    pub rating: u8,
    pub review: Option<String>,
    pub helpful_votes: u64,
    pub reported_count: u64,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&RatedBy> for RatingResponse {
    fn from(r: &RatedBy) -> Self {
        Self {
            rating_id: r.rating.rating_id.clone(),
            resource_id: r.rating.resource_id.clone(),
            user_id: r.rating.user_id.clone(),
            author_name: r.author_name.clone(),
            rating: r.rating.rating,
            review: r.rating.review.clone(),
            helpful_votes: r.rating.helpful_votes,
            reported_count: r.rating.reported_count,
            is_verified: r.rating.is_verified,
            created_at: r.rating.created_at,
            updated_at: r.rating.updated_at,
        }
    }
}

impl RatingResponse {
    /// For endpoints that have the bare entity but no author join.
    pub fn without_author(r: &RatingEntity) -> Self {
        Self::from(&RatedBy {
            rating: r.clone(),
            author_name: r.user_id.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Roadmaps
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStepRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: String,
    pub order: u32,
    #[validate(range(min = MIN_STEP_HOURS, max = MAX_STEP_HOURS))]
    pub estimated_hours: f64,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

impl RoadmapStepRequest {
    pub fn into_step(self) -> RoadmapStep {
        RoadmapStep {
            title: self.title,
            description: self.description,
            order: self.order,
            estimated_hours: self.estimated_hours,
            prerequisites: self.prerequisites,
            resources: self.resources,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoadmapRequest {
    pub subject_code: String,
    #[serde(rename = "type")]
    pub kind: RoadmapKind,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    #[validate(nested)]
    pub steps: Vec<RoadmapStepRequest>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoadmapRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    #[validate(nested)]
    pub steps: Option<Vec<RoadmapStepRequest>>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStepResponse {
    pub title: String,
    pub description: String,
    pub order: u32,
    pub estimated_hours: f64,
    pub prerequisites: Vec<String>,
    pub resources: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapResponse {
    pub roadmap_id: String,
    pub subject_id: String,
    #[serde(rename = "type")]
    pub kind: RoadmapKind,
    pub title: String,
    pub description: String,
    pub total_estimated_hours: f64,
    pub difficulty: Difficulty,
    pub steps: Vec<RoadmapStepResponse>,
    pub created_by: String,
    pub is_public: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&RoadmapEntity> for RoadmapResponse {
    fn from(m: &RoadmapEntity) -> Self {
        Self {
            roadmap_id: m.roadmap_id.clone(),
            subject_id: m.subject_id.clone(),
            kind: m.kind,
            title: m.title.clone(),
            description: m.description.clone(),
            total_estimated_hours: m.total_estimated_hours,
            difficulty: m.difficulty,
            steps: m
                .sorted_steps()
                .into_iter()
                .map(|s| RoadmapStepResponse {
                    title: s.title,
                    description: s.description,
                    order: s.order,
                    estimated_hours: s.estimated_hours,
                    prerequisites: s.prerequisites,
                    resources: s.resources,
                })
                .collect(),
            created_by: m.created_by.clone(),
            is_public: m.is_public,
            tags: m.tags.clone(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Admin / misc
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_rejects_unknown_sort_and_type() {
        let ok: Result<ListResourcesQuery, _> =
            serde_json::from_str(r#"{"sort":"createdAt","type":"notes"}"#);
        assert!(ok.is_ok());

        let bad_sort: Result<ListResourcesQuery, _> =
            serde_json::from_str(r#"{"sort":"password_hash"}"#);
        assert!(bad_sort.is_err());

        let bad_type: Result<ListResourcesQuery, _> =
            serde_json::from_str(r#"{"type":"torrent"}"#);
        assert!(bad_type.is_err());
    }

    #[test]
    fn rating_request_bounds() {
        let req = SubmitRatingRequest {
            rating: 5,
            review: None,
        };
        assert!(req.validate().is_ok());

        let req = SubmitRatingRequest {
            rating: 6,
            review: None,
        };
        assert!(req.validate().is_err());

        // 3.5 is not an integer, so it fails before validation.
        let parsed: Result<SubmitRatingRequest, _> = serde_json::from_str(r#"{"rating":3.5}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn step_hours_bounds() {
        let mk = |hours: f64| RoadmapStepRequest {
            title: "read".into(),
            description: String::new(),
            order: 1,
            estimated_hours: hours,
            prerequisites: vec![],
            resources: vec![],
        };
        assert!(mk(0.5).validate().is_ok());
        assert!(mk(100.0).validate().is_ok());
        assert!(mk(0.4).validate().is_err());
        assert!(mk(250.0).validate().is_err());
    }
}
