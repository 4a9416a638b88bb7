use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Privilege identifier carried in the token (e.g. `"TENANT_LIST"`).
///
/// The dashboard uses these to decide which menu entries and screens to offer.
/// The server still enforces every privilege; a missing one on the client only
/// hides UI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}
