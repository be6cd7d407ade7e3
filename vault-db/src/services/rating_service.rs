//! Rating upsert and aggregate recompute
//!
//! The denormalized aggregate on a resource (`average_rating`,
//! `total_ratings`, `rating_distribution`) is a cache of the rating table.
//! It is maintained by one idempotent routine that recomputes from the full
//! current set after every rating mutation; deltas are never applied
//! incrementally. A failed recompute is logged and swallowed so the
//! triggering request still succeeds, and a recompute against a since
//! deleted resource is a no-op.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use vault_core::types::{check_rating_value, check_review, RatingDistribution};
use vault_core::{Page, PageParams, VaultError, VaultResult};

use crate::entities::RatingEntity;
use crate::repos::Database;

/// A rating joined with its author's display name.
#[derive(Debug, Clone)]
pub struct RatedBy {
    pub rating: RatingEntity,
    pub author_name: String,
}

#[derive(Clone)]
pub struct RatingService {
    db: Arc<Database>,
}

impl RatingService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Submit or overwrite the caller's rating of a resource.
    ///
    /// A second submission from the same user updates the stored stars and
    /// review in place; `helpful_votes`, `reported_count` and `is_verified`
    /// stay untouched. The aggregate recompute runs after the write
    /// acknowledges and before the response.
    pub async fn submit(
        &self,
        resource_id: &str,
        user_id: &str,
        value: u8,
        review: Option<String>,
    ) -> VaultResult<RatedBy> {
        check_rating_value(value)?;
        check_review(review.as_deref())?;

        self.db
            .resources
            .get(resource_id)
            .await?
            .ok_or_else(|| VaultError::not_found("Resource", resource_id))?;

        let rating = match self.db.ratings.find_pair(resource_id, user_id).await? {
            Some(mut existing) => {
                let now = Utc::now();
                self.db
                    .ratings
                    .update_value(&existing.rating_id, value, review.clone(), now)
                    .await?;
                existing.rating = value;
                existing.review = review;
                existing.updated_at = now;
                existing
            }
            None => {
                let entity = RatingEntity::new(
                    resource_id.to_string(),
                    user_id.to_string(),
                    value,
                    review,
                );
                self.db.ratings.create(&entity).await?
            }
        };

        self.recompute_aggregate(resource_id).await;

        let author_name = match self.db.users.by_id(user_id).await? {
            Some(user) => user.display_name,
            None => user_id.to_string(),
        };
        Ok(RatedBy { rating, author_name })
    }

    /// Delete a rating; owner or admin only, enforced by the caller having
    /// resolved the entity. Triggers the recompute for its resource.
    pub async fn delete(&self, rating: &RatingEntity) -> VaultResult<()> {
        self.db.ratings.delete(&rating.rating_id).await?;
        self.recompute_aggregate(&rating.resource_id).await;
        Ok(())
    }

    pub async fn mark_helpful(&self, rating_id: &str) -> VaultResult<RatingEntity> {
        self.db
            .ratings
            .get(rating_id)
            .await?
            .ok_or_else(|| VaultError::not_found("Rating", rating_id))?;
        self.db.ratings.add_helpful_vote(rating_id).await?;
        self.db
            .ratings
            .get(rating_id)
            .await?
            .ok_or_else(|| VaultError::not_found("Rating", rating_id))
    }

    /// One page of a resource's ratings with author names attached. A
    /// rating whose author no longer exists keeps its user id as the name.
    pub async fn list_for_resource(
        &self,
        resource_id: &str,
        params: PageParams,
    ) -> VaultResult<Page<RatedBy>> {
        self.db
            .resources
            .get(resource_id)
            .await?
            .ok_or_else(|| VaultError::not_found("Resource", resource_id))?;

        let (items, total) = self.db.ratings.list_for_resource(resource_id, params).await?;

        let author_ids: Vec<String> = items.iter().map(|r| r.user_id.clone()).collect();
        let names: HashMap<String, String> = self
            .db
            .users
            .display_names(author_ids)
            .await?
            .into_iter()
            .collect();

        let joined = items
            .into_iter()
            .map(|rating| {
                let author_name = names
                    .get(&rating.user_id)
                    .cloned()
                    .unwrap_or_else(|| rating.user_id.clone());
                RatedBy { rating, author_name }
            })
            .collect();
        Ok(Page::new(joined, params, total))
    }

    /// Recompute and persist a resource's aggregate from the full rating
    /// set. Best effort: failures are logged at WARN and never surfaced to
    /// the triggering request.
    pub async fn recompute_aggregate(&self, resource_id: &str) {
        if let Err(e) = self.try_recompute(resource_id).await {
            tracing::warn!(
                resource_id = %resource_id,
                error = %e,
                "rating aggregate recompute failed"
            );
        }
    }

    async fn try_recompute(&self, resource_id: &str) -> VaultResult<()> {
        let values = self.db.ratings.values_for_resource(resource_id).await?;
        let (average, total, distribution) = aggregate(&values);
        self.db
            .resources
            .set_aggregate(resource_id, average, total, distribution)
            .await?;
        tracing::debug!(
            resource_id = %resource_id,
            total = total,
            average = average,
            "rating aggregate recomputed"
        );
        Ok(())
    }
}

/// Aggregate a set of star values: mean rounded to one decimal (half away
/// from zero), total count, and per-star buckets. An empty set resets
/// everything to zero.
pub fn aggregate(values: &[u8]) -> (f64, u64, RatingDistribution) {
    let mut distribution = RatingDistribution::default();
    if values.is_empty() {
        return (0.0, 0, distribution);
    }
    let mut sum: u64 = 0;
    for &v in values {
        distribution.record(v);
        sum += u64::from(v);
    }
    let mean = sum as f64 / values.len() as f64;
    let average = (mean * 10.0).round() / 10.0;
    (average, values.len() as u64, distribution)
}
