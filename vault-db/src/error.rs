//! Driver error mapping

use vault_core::VaultError;

/// Map a driver error onto the shared taxonomy.
///
/// Unique-index violations surface as [`VaultError::Conflict`] so duplicate
/// subject codes, usernames or (resource, user) rating pairs become 409s
/// instead of opaque 500s.
pub fn map_db_error(e: surrealdb::Error) -> VaultError {
    let msg = e.to_string();
    if msg.contains("already contains") {
        VaultError::Conflict(msg)
    } else {
        VaultError::Storage(msg)
    }
}
