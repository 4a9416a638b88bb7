//! Wiring of the session layer for a front end.

use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::ClientConfig;
use crate::context::SessionContext;
use crate::error::ApiError;
use crate::guard::RouteGuard;
use crate::headers::DefaultHeaders;
use crate::http::ApiClient;
use crate::navigation::Navigator;
use crate::session::SessionStore;
use crate::storage::CredentialStorage;

/// Everything a front end needs, built around one [`SessionContext`].
#[derive(Debug, Clone)]
pub struct App {
    pub session: Arc<SessionContext>,
    pub api: ApiClient,
    pub auth: AuthService,
    pub guard: RouteGuard,
}

impl App {
    pub fn new(
        config: ClientConfig,
        storage: Arc<dyn CredentialStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let store = SessionStore::new(storage, config.storage_key.clone(), DefaultHeaders::new());
        let session = Arc::new(SessionContext::new(store, navigator, config.login_path.clone()));
        let guard = RouteGuard::from_config(&config);
        let api = ApiClient::new(config, session.clone())?;
        let auth = AuthService::new(api.clone());

        Ok(Self {
            session,
            api,
            auth,
            guard,
        })
    }
}
