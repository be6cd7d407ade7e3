//! Repositories
//!
//! Query plumbing only; business rules live in [`crate::services`].

pub mod catalog;
pub mod rating;
pub mod resource;
pub mod roadmap;
pub mod user;

pub use catalog::CatalogRepo;
pub use rating::RatingRepo;
pub use resource::{ResourceRepo, ResourceSearch};
pub use roadmap::RoadmapRepo;
pub use user::UserRepo;

use crate::datastore::{self, Db};
use vault_core::VaultResult;

/// All repositories over one shared connection.
#[derive(Clone)]
pub struct Database {
    pub catalog: CatalogRepo,
    pub resources: ResourceRepo,
    pub ratings: RatingRepo,
    pub roadmaps: RoadmapRepo,
    pub users: UserRepo,
    db: Db,
}

impl Database {
    pub fn new(db: Db) -> Self {
        Self {
            catalog: CatalogRepo::new(db.clone()),
            resources: ResourceRepo::new(db.clone()),
            ratings: RatingRepo::new(db.clone()),
            roadmaps: RoadmapRepo::new(db.clone()),
            users: UserRepo::new(db.clone()),
            db,
        }
    }

    /// Apply tables and indexes. Idempotent; called once at startup.
    pub async fn init_schema(&self) -> VaultResult<()> {
        datastore::init_schema(&self.db).await
    }
}
