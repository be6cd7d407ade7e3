//! Study Vault persistence layer
//!
//! Talks to SurrealDB through plain queries with bound parameters. Records
//! are addressed by their domain-id fields (`branch_id`, `resource_id`, …),
//! each backed by a UNIQUE index; reads use `SELECT * OMIT id` so entities
//! stay plain serde structs.
//!
//! Layout follows the usual three tiers:
//! - [`entities`]: storage-shaped structs, one module per aggregate
//! - [`repos`]: query plumbing, no business rules
//! - [`services`]: rating aggregation, resource filter composition and
//!   catalog assembly

pub mod datastore;
pub mod entities;
pub mod error;
pub mod repos;
pub mod schema;
pub mod services;

pub use datastore::{connect, Db};
pub use error::map_db_error;
pub use repos::Database;
pub use services::{CatalogService, RatedBy, RatingService, ResourceFilter, ResourceQuery};
