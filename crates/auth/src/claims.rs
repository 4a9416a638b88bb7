use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tenantdesk_core::{TenantId, UserId};

use crate::{Permission, Role};

/// Claims embedded in a dashboard session token.
///
/// This is the user profile the client works with once a token has been
/// decoded. Descriptive fields the server may leave out are optional so that a
/// sparse profile still decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,

    /// Tenant the user logged into. Absent for platform-level users.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(default)]
    pub tenant_logo_url: Option<String>,

    pub name: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,

    pub login_id: String,
    #[serde(default)]
    pub mobile: Option<String>,
    pub email: String,

    /// Account category as reported by the server (opaque to the client).
    pub user_type: String,

    #[serde(default)]
    pub role_name: Option<Role>,

    /// Privileges granted through the role, as decided by the server.
    #[serde(default)]
    pub privileges: Vec<Permission>,

    /// Expiration, in seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// A token is expired once `now` reaches `exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn has_privilege(&self, privilege: &Permission) -> bool {
        self.privileges.iter().any(|p| p == privilege)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse_payload() -> serde_json::Value {
        serde_json::json!({
            "user_id": UserId::new(),
            "tenant_id": null,
            "name": "Alice Smith",
            "login_id": "alice",
            "email": "alice@example.com",
            "user_type": "SUPER_ADMIN",
            "exp": 1_700_000_000,
        })
    }

    #[test]
    fn sparse_profile_decodes_with_defaults() {
        let claims: Claims = serde_json::from_value(sparse_payload()).unwrap();

        assert!(claims.tenant_id.is_none());
        assert!(claims.job_title.is_none());
        assert!(claims.role_name.is_none());
        assert!(claims.privileges.is_empty());
        assert_eq!(claims.email, "alice@example.com");
    }

    #[test]
    fn missing_exp_is_rejected() {
        let mut payload = sparse_payload();
        payload.as_object_mut().unwrap().remove("exp");

        assert!(serde_json::from_value::<Claims>(payload).is_err());
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let claims: Claims = serde_json::from_value(sparse_payload()).unwrap();

        assert!(!claims.is_expired_at(claims.exp - 1));
        assert!(claims.is_expired_at(claims.exp));
        assert!(claims.is_expired_at(claims.exp + 1));
        assert_eq!(claims.expires_at().unwrap().timestamp(), claims.exp);
    }

    #[test]
    fn privilege_lookup() {
        let mut payload = sparse_payload();
        payload["role_name"] = "Administrator".into();
        payload["privileges"] = serde_json::json!(["TENANT_LIST", "USER_CREATE"]);
        let claims: Claims = serde_json::from_value(payload).unwrap();

        let role = claims.role_name.as_ref().unwrap();
        assert_eq!(role.as_str(), "Administrator");
        assert_eq!(role.to_string(), "Administrator");
        assert!(claims.has_privilege(&Permission::new("USER_CREATE")));
        assert!(!claims.has_privilege(&Permission::new("ROLE_DELETE")));
    }
}
