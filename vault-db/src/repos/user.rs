//! User repository

use chrono::Utc;
use vault_core::types::Role;
use vault_core::VaultResult;

use crate::datastore::Db;
use crate::entities::UserEntity;
use crate::error::map_db_error;

#[derive(Clone)]
pub struct UserRepo {
    db: Db,
}

impl UserRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, entity: &UserEntity) -> VaultResult<UserEntity> {
        self.db
            .query(format!("CREATE {} CONTENT $data RETURN NONE", UserEntity::TABLE))
            .bind(("data", entity.clone()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(entity.clone())
    }

    pub async fn by_id(&self, user_id: &str) -> VaultResult<Option<UserEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM user WHERE user_id = $user_id LIMIT 1")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn by_username(&self, username: &str) -> VaultResult<Option<UserEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn by_email(&self, email: &str) -> VaultResult<Option<UserEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    pub async fn by_verification_token(&self, token: &str) -> VaultResult<Option<UserEntity>> {
        let mut response = self
            .db
            .query("SELECT * OMIT id FROM user WHERE verification_token = $token LIMIT 1")
            .bind(("token", token.to_string()))
            .await
            .map_err(map_db_error)?;
        response.take(0).map_err(map_db_error)
    }

    /// Display names for a set of users, for attaching to rating pages.
    pub async fn display_names(&self, user_ids: Vec<String>) -> VaultResult<Vec<(String, String)>> {
        let mut response = self
            .db
            .query("SELECT user_id, display_name FROM user WHERE user_id IN $user_ids")
            .bind(("user_ids", user_ids))
            .await
            .map_err(map_db_error)?;

        #[derive(serde::Deserialize)]
        struct Row {
            user_id: String,
            display_name: String,
        }
        let rows: Vec<Row> = response.take(0).map_err(map_db_error)?;
        Ok(rows.into_iter().map(|r| (r.user_id, r.display_name)).collect())
    }

    /// Mark the account verified and clear its token.
    pub async fn mark_verified(&self, user_id: &str) -> VaultResult<()> {
        self.db
            .query(
                "UPDATE user SET is_verified = true, verification_token = NONE, \
                 updated_at = $now WHERE user_id = $user_id RETURN NONE",
            )
            .bind(("now", Utc::now()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    pub async fn set_verification_token(&self, user_id: &str, token: &str) -> VaultResult<()> {
        self.db
            .query(
                "UPDATE user SET verification_token = $token, updated_at = $now \
                 WHERE user_id = $user_id RETURN NONE",
            )
            .bind(("token", token.to_string()))
            .bind(("now", Utc::now()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }

    pub async fn set_role(&self, user_id: &str, role: Role) -> VaultResult<()> {
        self.db
            .query(
                "UPDATE user SET role = $role, updated_at = $now \
                 WHERE user_id = $user_id RETURN NONE",
            )
            .bind(("role", role))
            .bind(("now", Utc::now()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(map_db_error)?
            .check()
            .map_err(map_db_error)?;
        Ok(())
    }
}
