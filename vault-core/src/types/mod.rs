//! Core domain types

pub mod catalog;
pub mod rating;
pub mod resource;
pub mod roadmap;
pub mod user;

pub use catalog::{BranchNode, CatalogStructure, ProgramNode, SemesterNode, SubjectLeaf, YearNode};
pub use rating::{check_rating_value, check_review, MAX_RATING, MAX_REVIEW_LEN, MIN_RATING};
pub use resource::{RatingDistribution, ResourceKind, SortKey};
pub use roadmap::{Difficulty, RoadmapKind, MAX_STEP_HOURS, MIN_STEP_HOURS};
pub use user::Role;
