//! Rating entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// One user's rating of one resource.
///
/// The (resource_id, user_id) pair is UNIQUE; a second submission from the
/// same user overwrites the stars and review via the upsert path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingEntity {
    pub rating_id: String,
    pub resource_id: String,
    pub user_id: String,
    pub rating: u8,
    #[serde(default)]
    pub review: Option<String>,
    pub helpful_votes: u64,
    pub reported_count: u64,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RatingEntity {
    pub const TABLE: &'static str = "rating";

    pub fn new(resource_id: String, user_id: String, rating: u8, review: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            rating_id: new_id("rat"),
            resource_id,
            user_id,
            rating,
            review,
            helpful_votes: 0,
            reported_count: 0,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}
