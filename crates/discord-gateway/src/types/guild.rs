//! Guild and role types used for permission checks.

use serde::{Deserialize, Serialize};

/// The ADMINISTRATOR permission bit.
pub const ADMINISTRATOR: u64 = 1 << 3;

/// A guild role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,

    /// Permission bit set, serialized as a decimal string.
    #[serde(default)]
    pub permissions: String,
}

impl Role {
    pub fn permission_bits(&self) -> u64 {
        self.permissions.parse().unwrap_or(0)
    }

    pub fn is_administrator(&self) -> bool {
        self.permission_bits() & ADMINISTRATOR == ADMINISTRATOR
    }
}

/// The parts of a guild needed to resolve permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Guild {
    /// Whether a member holding `member_roles` has administrator rights.
    ///
    /// The guild owner always does. Every member also holds the `@everyone`
    /// role, whose id equals the guild id.
    pub fn grants_administrator(&self, user_id: &str, member_roles: &[String]) -> bool {
        if self.owner_id == user_id {
            return true;
        }
        self.roles
            .iter()
            .filter(|role| role.id == self.id || member_roles.contains(&role.id))
            .any(Role::is_administrator)
    }
}
