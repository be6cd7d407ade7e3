//! Storage entities
//!
//! One serde struct per table. Record ids are driver-managed and omitted on
//! read; every entity carries its own domain id with a UNIQUE index.

pub mod catalog;
pub mod rating;
pub mod resource;
pub mod roadmap;
pub mod user;

pub use catalog::{BranchEntity, ProgramEntity, SemesterEntity, SubjectEntity, YearEntity};
pub use rating::RatingEntity;
pub use resource::ResourceEntity;
pub use roadmap::{RoadmapEntity, RoadmapStep};
pub use user::UserEntity;

use uuid::Uuid;

/// Generate a prefixed domain id, e.g. `res_9f8a…`
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_prefixed_and_unique() {
        let a = new_id("res");
        let b = new_id("res");
        assert!(a.starts_with("res_"));
        assert_ne!(a, b);
    }
}
