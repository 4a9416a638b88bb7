//! `tenantdesk-client`
//!
//! **Responsibility:** client-side session lifecycle for the tenant
//! administration dashboard.
//!
//! This crate provides:
//! - Persisted credential + default `Authorization` header, updated together
//! - An observable auth state machine (init / login / logout)
//! - The shared API client with credential injection and `401` teardown
//! - Route gating on session state
//!
//! Screens are out of scope; they consume [`App`].

pub mod app;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod flash;
pub mod guard;
pub mod headers;
pub mod http;
pub mod navigation;
pub mod session;
pub mod state;
pub mod storage;

pub use app::App;
pub use auth::{AuthService, LoginRequest};
pub use config::{ClientConfig, ConfigError};
pub use context::SessionContext;
pub use error::{ApiError, AuthFailure, ErrorPayload, LoginError, SessionError};
pub use flash::FlashMessages;
pub use guard::{GuardOutcome, RouteGuard};
pub use headers::DefaultHeaders;
pub use http::ApiClient;
pub use navigation::{MemoryNavigator, Navigator};
pub use session::SessionStore;
pub use state::{AuthAction, AuthState, AuthStatus};
pub use storage::{CredentialStorage, FileStorage, MemoryStorage, StorageError};

#[cfg(test)]
pub(crate) mod test_support {
    use jsonwebtoken::{Algorithm, EncodingKey, Header};

    pub fn now() -> i64 {
        tenantdesk_auth::now_seconds()
    }

    pub fn mint_token(email: &str, exp: i64) -> String {
        let claims = serde_json::json!({
            "user_id": uuid::Uuid::now_v7(),
            "tenant_id": uuid::Uuid::now_v7(),
            "tenant_name": "Acme",
            "name": "Alice Smith",
            "login_id": "alice",
            "email": email,
            "user_type": "TENANT_USER",
            "role_name": "Administrator",
            "privileges": ["TENANT_LIST", "USER_LIST"],
            "exp": exp,
        });

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("failed to encode jwt")
    }
}
