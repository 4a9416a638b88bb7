//! Login, logout and boot-time session restore.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use tenantdesk_auth::Claims;

use crate::context::SessionContext;
use crate::error::LoginError;
use crate::http::ApiClient;
use crate::state::AuthState;

/// Body of the credential exchange.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub tenant_id: Option<String>,
    pub login_id: String,
    pub password: String,
}

impl LoginRequest {
    /// An empty `tenant_id` means "no tenant" and is sent as `null`.
    pub fn new(tenant_id: &str, login_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            tenant_id: Some(tenant_id).filter(|t| !t.is_empty()).map(str::to_string),
            login_id: login_id.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("tenant_id", &self.tenant_id)
            .field("login_id", &self.login_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Auth operations the UI calls directly.
#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.api.session()
    }

    pub fn state(&self) -> AuthState {
        self.session().state()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.session().subscribe()
    }

    /// See [`SessionContext::initialize`].
    pub fn initialize(&self) -> AuthState {
        self.session().initialize()
    }

    /// Exchange credentials for a session token and log in with it.
    ///
    /// Errors go back to the caller untouched and leave the session as it was.
    pub async fn login(&self, tenant_id: &str, login_id: &str, password: &str) -> Result<Claims, LoginError> {
        let request = LoginRequest::new(tenant_id, login_id, password);
        let endpoint = self.api.config().login_endpoint();
        tracing::debug!(?request, "logging in");

        let response: LoginResponse = self
            .api
            .post_json(&endpoint, &request)
            .await
            .inspect_err(|err| tracing::warn!(login_id, error = %err, "login rejected"))?;

        self.session()
            .establish(&response.token)
            .inspect_err(|err| tracing::error!(login_id, error = %err, "could not adopt issued token"))
    }

    pub fn logout(&self) {
        self.session().logout();
    }
}
