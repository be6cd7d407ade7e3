//! User roles

use serde::{Deserialize, Serialize};

/// Account role, in increasing order of privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Moderators and admins may approve content and author roadmaps
    pub fn can_moderate(&self) -> bool {
        *self >= Self::Moderator
    }

    pub fn is_admin(&self) -> bool {
        *self == Self::Admin
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ordering_matches_privilege() {
        assert!(Role::Admin.can_moderate());
        assert!(Role::Moderator.can_moderate());
        assert!(!Role::User.can_moderate());
        assert!(!Role::Moderator.is_admin());
    }
}
