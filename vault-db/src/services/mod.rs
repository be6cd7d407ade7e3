//! Business logic over the repositories

pub mod catalog_service;
pub mod rating_service;
pub mod resource_query;

pub use catalog_service::CatalogService;
pub use rating_service::{RatedBy, RatingService};
pub use resource_query::{ResourceFilter, ResourceQuery};
