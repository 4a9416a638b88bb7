//! The session context: one object that owns every piece of session truth.
//!
//! In-memory [`AuthState`], the persisted credential and the default
//! `Authorization` header only ever change through the methods here, each of
//! which updates all three together.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::watch;

use tenantdesk_auth::{Claims, DecodeError};

use crate::error::{AuthFailure, LoginError, SessionError};
use crate::flash::FlashMessages;
use crate::navigation::Navigator;
use crate::session::SessionStore;
use crate::state::{AuthAction, AuthState, reduce};

#[derive(Debug, Error)]
enum RestoreError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub struct SessionContext {
    store: SessionStore,
    state: watch::Sender<AuthState>,
    flash: FlashMessages,
    navigator: Arc<dyn Navigator>,
    landing_path: String,
    init_started: AtomicBool,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("store", &self.store)
            .field("state", &*self.state.borrow())
            .field("landing_path", &self.landing_path)
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    /// `landing_path` is where a forced logout sends the user.
    pub fn new(store: SessionStore, navigator: Arc<dyn Navigator>, landing_path: impl Into<String>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            store,
            state,
            flash: FlashMessages::new(),
            navigator,
            landing_path: landing_path.into(),
            init_started: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn flash(&self) -> &FlashMessages {
        &self.flash
    }

    /// Current snapshot.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Boot-time session check. Runs once; later calls return the current
    /// state untouched.
    ///
    /// Never fails: anything that goes wrong while restoring is logged and
    /// the session starts logged out.
    pub fn initialize(&self) -> AuthState {
        if self.init_started.swap(true, Ordering::SeqCst) {
            tracing::warn!("session already initialized; ignoring repeated init");
            return self.state();
        }

        let user = match self.restore() {
            Ok(user) => user,
            Err(err) => {
                tracing::error!(error = %err, "failed to restore session; starting logged out");
                if let Err(err) = self.store.set_session(None) {
                    tracing::error!(error = %err, "failed to clear unusable credential");
                }
                None
            }
        };

        match &user {
            Some(claims) => tracing::info!(login_id = %claims.login_id, "session restored"),
            None => tracing::info!("no active session"),
        }

        self.dispatch(AuthAction::Initialize { user });
        self.state()
    }

    fn restore(&self) -> Result<Option<Claims>, RestoreError> {
        let token = self.store.get_session()?;
        if !tenantdesk_auth::is_valid(token.as_deref())? {
            if token.is_some() {
                tracing::info!("stored credential has expired");
            }
            self.store.set_session(None)?;
            return Ok(None);
        }

        let Some(token) = token else {
            return Ok(None);
        };
        let claims = tenantdesk_auth::decode(&token)?;
        self.store.set_session(Some(&token))?;
        Ok(Some(claims))
    }

    /// Adopt a freshly issued token. Nothing changes unless the token decodes
    /// and is stored.
    pub(crate) fn establish(&self, token: &str) -> Result<Claims, LoginError> {
        let claims = tenantdesk_auth::decode(token)?;
        self.store.set_session(Some(token))?;
        self.dispatch(AuthAction::Login {
            user: claims.clone(),
        });
        tracing::info!(login_id = %claims.login_id, tenant_id = ?claims.tenant_id, "logged in");
        Ok(claims)
    }

    /// End the session. Always succeeds; storage failures are logged.
    pub fn logout(&self) {
        self.teardown();
        tracing::info!("logged out");
    }

    /// Server-driven logout after a `401`.
    ///
    /// The redirect (with its flash message) happens only for the request that
    /// actually ends a live session, so concurrent `401`s redirect once.
    pub(crate) fn force_logout(&self, failure: AuthFailure) {
        let was_logged_in = self.teardown();
        if !was_logged_in {
            tracing::debug!(reason = %failure, "401 without a live session; nothing to end");
            return;
        }

        tracing::warn!(reason = %failure, "session rejected by server; forcing logout");
        self.flash.put(failure.user_message());
        self.navigator.redirect(&self.landing_path);
    }

    /// Clear credential and header, then transition. Returns whether a user
    /// was logged in before.
    fn teardown(&self) -> bool {
        if let Err(err) = self.store.set_session(None) {
            tracing::error!(error = %err, "failed to clear stored credential");
        }
        self.dispatch(AuthAction::Logout)
    }

    fn dispatch(&self, action: AuthAction) -> bool {
        let mut was_logged_in = false;
        self.state.send_modify(|state| {
            was_logged_in = state.is_logged_in;
            reduce(state, action);
        });
        was_logged_in
    }
}
