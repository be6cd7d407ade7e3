//! Resource repository
//!
//! Carries the executable side of the filter composer: the composed WHERE
//! expression arrives as a [`ResourceSearch`] whose parameters are always
//! bound, referenced or not. The query text is the only variable part, and
//! it is assembled exclusively from fixed fragments.

use chrono::Utc;
use serde::Deserialize;
use vault_core::types::RatingDistribution;
use vault_core::{PageParams, VaultResult};

use crate::datastore::Db;
use crate::entities::ResourceEntity;
use crate::error::map_db_error;

/// A fully composed resource search: WHERE text plus its bind values.
#[derive(Debug, Clone)]
pub struct ResourceSearch {
    pub where_sql: String,
    pub order_field: &'static str,
    pub descending: bool,
    pub q: String,
    pub kind: String,
    pub subject_id: String,
    pub subject_ids: Vec<String>,
    pub added_by: String,
}

#[derive(Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Clone)]
pub struct ResourceRepo {
    db: Db,
}

impl ResourceRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, entity: &ResourceEntity) -> VaultResult<ResourceEntity> {
        self.db
            .query(format!("CREATE {} CONTENT $data RETURN NONE", ResourceEntity::TABLE))
            .bind(("data", entity.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(entity.clone())
    }

    pub async fn get(&self, resource_id: &str) -> VaultResult<Option<ResourceEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM resource WHERE resource_id = $resource_id LIMIT 1")
            .bind(("resource_id", resource_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn update(&self, entity: &ResourceEntity) -> VaultResult<()> {
        self.db
            .query("UPDATE resource CONTENT $data WHERE resource_id = $resource_id RETURN NONE")
            .bind(("data", entity.clone()))
            .bind(("resource_id", entity.resource_id.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    pub async fn delete(&self, resource_id: &str) -> VaultResult<()> {
        self.db
            .query("DELETE resource WHERE resource_id = $resource_id")
            .bind(("resource_id", resource_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    /// Flip moderation state.
    pub async fn set_approved(&self, resource_id: &str, approved: bool) -> VaultResult<()> {
        self.db
            .query(
                "UPDATE resource SET is_approved = $approved, updated_at = $now \
                 WHERE resource_id = $resource_id RETURN NONE",
            )
            .bind(("approved", approved))
            .bind(("now", Utc::now()))
            .bind(("resource_id", resource_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    /// Persist a recomputed rating aggregate. A no-op when the resource has
    /// been deleted in the meantime.
    pub async fn set_aggregate(
        &self,
        resource_id: &str,
        average_rating: f64,
        total_ratings: u64,
        distribution: RatingDistribution,
    ) -> VaultResult<()> {
        self.db
            .query(
                "UPDATE resource SET average_rating = $avg, total_ratings = $total, \
                 rating_distribution = $dist WHERE resource_id = $resource_id RETURN NONE",
            )
            .bind(("avg", average_rating))
            .bind(("total", total_ratings))
            .bind(("dist", distribution))
            .bind(("resource_id", resource_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    /// Run a composed search: one page of matches plus the total count.
    pub async fn search(
        &self,
        search: &ResourceSearch,
        params: PageParams,
    ) -> VaultResult<(Vec<ResourceEntity>, u64)> {
        let direction = if search.descending { "DESC" } else { "ASC" };
        let page_query = format!(
            "SELECT * OMIT id FROM resource WHERE {} ORDER BY {} {} LIMIT {} START {}",
            search.where_sql,
            search.order_field,
            direction,
            params.limit,
            params.skip(),
        );
        let count_query = format!(
            "SELECT count() AS total FROM resource WHERE {} GROUP ALL",
            search.where_sql,
        );

        let mut response = self
            .db
            .query(page_query)
            .query(count_query)
            .bind(("q", search.q.clone()))
            .bind(("kind", search.kind.clone()))
            .bind(("subject_id", search.subject_id.clone()))
            .bind(("subject_ids", search.subject_ids.clone()))
            .bind(("added_by", search.added_by.clone()))
            .await
            .map_err(map_db_error)?;

        let items: Vec<ResourceEntity> = response.take(0).map_err(map_db_error)?;
        let count: Option<CountRow> = response.take(1).map_err(map_db_error)?;
        Ok((items, count.map_or(0, |c| c.total)))
    }

    /// Unapproved resources, oldest first, for the moderation queue.
    pub async fn pending(&self, params: PageParams) -> VaultResult<(Vec<ResourceEntity>, u64)> {
        let query = format!(
            "SELECT * OMIT id FROM resource WHERE is_approved = false \
             ORDER BY created_at ASC LIMIT {} START {}",
            params.limit,
            params.skip(),
        );
        let mut response = self
            .db
            .query(query)
            .query("SELECT count() AS total FROM resource WHERE is_approved = false GROUP ALL")
            .await
            .map_err(map_db_error)?;
        let items: Vec<ResourceEntity> = response.take(0).map_err(map_db_error)?;
        let count: Option<CountRow> = response.take(1).map_err(map_db_error)?;
        Ok((items, count.map_or(0, |c| c.total)))
    }
}
