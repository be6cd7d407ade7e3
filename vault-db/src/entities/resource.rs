//! Resource entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vault_core::types::{RatingDistribution, ResourceKind};

use super::new_id;

/// A learning artifact attached to one subject.
///
/// `average_rating`, `total_ratings` and `rating_distribution` are derived
/// from the rating table and written only by the aggregate recompute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceEntity {
    pub resource_id: String,
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

impl ResourceEntity {
    pub const TABLE: &'static str = "resource";

    /// New resource from a contributor; starts unapproved with an empty
    /// aggregate.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ResourceKind,
        title: String,
        url: String,
        description: String,
        provider: String,
        subject_id: String,
        topics: Vec<String>,
        tags: Vec<String>,
        prerequisites: Vec<String>,
        added_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            resource_id: new_id("res"),
            kind,
            title,
            url,
            description,
            provider,
            subject_id,
            topics,
            tags,
            prerequisites,
            added_by,
            is_approved: false,
            quality_score: 0,
            average_rating: 0.0,
            total_ratings: 0,
            rating_distribution: RatingDistribution::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
