//! Study Vault HTTP API
//!
//! Request flow: route → DTO validation → handler → store service → JSON
//! response. Auth is a JWT access/refresh pair delivered as HTTP-only
//! cookies with a bearer-header fallback; mutating routes sit behind the
//! auth middleware and role checks.

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod mailer;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::{create_server, run_server};
pub use state::AppState;
