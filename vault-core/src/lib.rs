//! Study Vault core domain layer
//!
//! Shared types for the catalog hierarchy, learning resources, ratings and
//! roadmaps, plus the error taxonomy and pagination contract used by every
//! layer above. This crate performs no I/O.

pub mod error;
pub mod pagination;
pub mod types;

pub use error::{VaultError, VaultResult};
pub use pagination::{
    Page, PageParams, DEFAULT_RATING_LIMIT, DEFAULT_RESOURCE_LIMIT, MAX_LIMIT,
};
