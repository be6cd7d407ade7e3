//! User entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vault_core::types::Role;

use super::new_id;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntity {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
    #[serde(default)]
    pub verification_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    pub const TABLE: &'static str = "user";

    pub fn new(
        username: String,
        email: String,
        display_name: String,
        password_hash: String,
        verification_token: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: new_id("usr"),
            username,
            email,
            display_name,
            password_hash,
            role: Role::User,
            is_verified: false,
            verification_token: Some(verification_token),
            created_at: now,
            updated_at: now,
        }
    }
}
