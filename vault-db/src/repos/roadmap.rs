//! Roadmap repository

use serde::Deserialize;
use vault_core::{PageParams, VaultResult};

use crate::datastore::Db;
use crate::entities::RoadmapEntity;
use crate::error::map_db_error;

#[derive(Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Clone)]
pub struct RoadmapRepo {
    db: Db,
}

impl RoadmapRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, entity: &RoadmapEntity) -> VaultResult<RoadmapEntity> {
        self.db
            .query(format!("CREATE {} CONTENT $data RETURN NONE", RoadmapEntity::TABLE))
            .bind(("data", entity.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(entity.clone())
    }

    pub async fn get(&self, roadmap_id: &str) -> VaultResult<Option<RoadmapEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM roadmap WHERE roadmap_id = $roadmap_id LIMIT 1")
            .bind(("roadmap_id", roadmap_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    /// One page of roadmaps, newest first. Anonymous callers only see
    /// public ones.
    pub async fn list(
        &self,
        public_only: bool,
        params: PageParams,
    ) -> VaultResult<(Vec<RoadmapEntity>, u64)> {
        let filter = if public_only { "is_public = true" } else { "true" };
        let page_query = format!(
            "SELECT * OMIT id FROM roadmap WHERE {} ORDER BY created_at DESC LIMIT {} START {}",
            filter,
            params.limit,
            params.skip(),
        );
        let count_query = format!(
            "SELECT count() AS total FROM roadmap WHERE {} GROUP ALL",
            filter,
        );
        let mut response = self
            .db
            .query(page_query)
            .query(count_query)
            .await
            .map_err(map_db_error)?;
        let items: Vec<RoadmapEntity> = response.take(0).map_err(map_db_error)?;
        let count: Option<CountRow> = response.take(1).map_err(map_db_error)?;
        Ok((items, count.map_or(0, |c| c.total)))
    }

    pub async fn by_subject(
        &self,
        subject_id: &str,
        public_only: bool,
    ) -> VaultResult<Vec<RoadmapEntity>> {
        let filter = if public_only {
            "subject_id = $subject_id AND is_public = true"
        } else {
            "subject_id = $subject_id"
        };
        let query = format!(
            "SELECT * OMIT id FROM roadmap WHERE {} ORDER BY created_at DESC",
            filter,
        );
        let mut response = self
            .db
            .query(query)
            .bind(("subject_id", subject_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    /// Unpublished roadmaps for the moderation queue, oldest first.
    pub async fn pending(&self, params: PageParams) -> VaultResult<(Vec<RoadmapEntity>, u64)> {
        let page_query = format!(
            "SELECT * OMIT id FROM roadmap WHERE is_public = false \
             ORDER BY created_at ASC LIMIT {} START {}",
            params.limit,
            params.skip(),
        );
        let mut response = self
            .db
            .query(page_query)
            .query("SELECT count() AS total FROM roadmap WHERE is_public = false GROUP ALL")
            .await
            .map_err(map_db_error)?;
        let items: Vec<RoadmapEntity> = response.take(0).map_err(map_db_error)?;
        let count: Option<CountRow> = response.take(1).map_err(map_db_error)?;
        Ok((items, count.map_or(0, |c| c.total)))
    }

    pub async fn update(&self, entity: &RoadmapEntity) -> VaultResult<()> {
        self.db
            .query("UPDATE roadmap CONTENT $data WHERE roadmap_id = $roadmap_id RETURN NONE")
            .bind(("data", entity.clone()))
            .bind(("roadmap_id", entity.roadmap_id.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    pub async fn delete(&self, roadmap_id: &str) -> VaultResult<()> {
        self.db
            .query("DELETE roadmap WHERE roadmap_id = $roadmap_id")
            .bind(("roadmap_id", roadmap_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }
}
