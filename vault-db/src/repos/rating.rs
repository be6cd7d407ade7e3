//! Rating repository

use chrono::{DateTime, Utc};
use serde::Deserialize;
use vault_core::{PageParams, VaultResult};

use crate::datastore::Db;
use crate::entities::RatingEntity;
use crate::error::map_db_error;

#[derive(Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Clone)]
pub struct RatingRepo {
    db: Db,
}

impl RatingRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, entity: &RatingEntity) -> VaultResult<RatingEntity> {
        self.db
            .query(format!("CREATE {} CONTENT $data RETURN NONE", RatingEntity::TABLE))
            .bind(("data", entity.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(entity.clone())
    }

    pub async fn get(&self, rating_id: &str) -> VaultResult<Option<RatingEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM rating WHERE rating_id = $rating_id LIMIT 1")
            .bind(("rating_id", rating_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    /// The one rating a user has on a resource, if any.
    pub async fn find_pair(
        &self,
        resource_id: &str,
        user_id: &str,
    ) -> VaultResult<Option<RatingEntity>> {
        let mut response = self
            .db
            .query(
                "SELECT * OMIT id FROM rating \
                 WHERE resource_id = $resource_id AND user_id = $user_id LIMIT 1",
            )
            .bind(("resource_id", resource_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    /// Overwrite stars and review on an existing rating; votes and
    /// verification flags stay untouched.
    pub async fn update_value(
        &self,
        rating_id: &str,
        rating: u8,
        review: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> VaultResult<()> {
        self.db
            .query(
                "UPDATE rating SET rating = $rating, review = $review, updated_at = $updated_at \
                 WHERE rating_id = $rating_id RETURN NONE",
            )
            .bind(("rating", rating))
            .bind(("review", review))
            .bind(("updated_at", updated_at))
            .bind(("rating_id", rating_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    /// Every star value currently on record for a resource. Input to the
    /// aggregate recompute; deliberately the full set, never a delta.
    pub async fn values_for_resource(&self, resource_id: &str) -> VaultResult<Vec<u8>> {
        let mut response = self
            .db
            .query("SELECT rating FROM rating WHERE resource_id = $resource_id")
            .bind(("resource_id", resource_id.to_string()))
            .await
            .map_err(map_db_error)?;

        #[derive(Deserialize)]
        struct Row {
            rating: u8,
        }
        let rows: Vec<Row> = response.take(0).map_err(map_db_error)?;
        Ok(rows.into_iter().map(|r| r.rating).collect())
    }

    /// One page of a resource's ratings, newest first.
    pub async fn list_for_resource(
        &self,
        resource_id: &str,
        params: PageParams,
    ) -> VaultResult<(Vec<RatingEntity>, u64)> {
        let page_query = format!(
            "SELECT * OMIT id FROM rating WHERE resource_id = $resource_id \
             ORDER BY created_at DESC LIMIT {} START {}",
            params.limit,
            params.skip(),
        );
        let mut response = self
            .db
            .query(page_query)
            .query(
                "SELECT count() AS total FROM rating \
                 WHERE resource_id = $resource_id GROUP ALL",
            )
            .bind(("resource_id", resource_id.to_string()))
            .await
            .map_err(map_db_error)?;
        let items: Vec<RatingEntity> = response.take(0).map_err(map_db_error)?;
        let count: Option<CountRow> = response.take(1).map_err(map_db_error)?;
        Ok((items, count.map_or(0, |c| c.total)))
    }

    pub async fn add_helpful_vote(&self, rating_id: &str) -> VaultResult<()> {
        self.db
            .query(
                "UPDATE rating SET helpful_votes += 1 \
                 WHERE rating_id = $rating_id RETURN NONE",
            )
            .bind(("rating_id", rating_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    pub async fn delete(&self, rating_id: &str) -> VaultResult<()> {
        self.db
            .query("DELETE rating WHERE rating_id = $rating_id")
            .bind(("rating_id", rating_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    /// Cascade used when a resource is removed.
    pub async fn delete_for_resource(&self, resource_id: &str) -> VaultResult<()> {
        self.db
            .query("DELETE rating WHERE resource_id = $resource_id")
            .bind(("resource_id", resource_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }
}
