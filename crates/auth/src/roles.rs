use serde::{Deserialize, Serialize};

/// Display name of the role a user holds inside their tenant (`"Administrator"`).
///
/// What a role grants is resolved server-side and arrives as
/// [`crate::Permission`]s, so the client only shows the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
