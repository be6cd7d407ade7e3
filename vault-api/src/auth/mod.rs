//! Authentication: JWT token pairs, password hashing, middleware

pub mod middleware;
pub mod password;
pub mod tokens;

pub use middleware::{optional_auth, require_admin, require_auth};
pub use password::{hash_password, verify_password};
pub use tokens::{AuthClaims, TokenKeys, TokenPair, TokenUse};
