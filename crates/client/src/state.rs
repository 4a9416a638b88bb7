//! Authentication state and its reducer.

use tenantdesk_auth::Claims;

/// Snapshot of the session as the UI sees it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    pub is_logged_in: bool,
    pub is_initialized: bool,
    pub user: Option<Claims>,
}

/// The three states the flags above encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus<'a> {
    Uninitialized,
    LoggedOut,
    LoggedIn(&'a Claims),
}

impl AuthState {
    pub fn status(&self) -> AuthStatus<'_> {
        match (&self.user, self.is_initialized) {
            (_, false) => AuthStatus::Uninitialized,
            (Some(user), true) if self.is_logged_in => AuthStatus::LoggedIn(user),
            _ => AuthStatus::LoggedOut,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Result of the boot-time session check.
    Initialize { user: Option<Claims> },
    Login { user: Claims },
    Logout,
}

/// Apply `action` to `state` in place.
pub fn reduce(state: &mut AuthState, action: AuthAction) {
    match action {
        AuthAction::Initialize { user } => {
            state.is_logged_in = user.is_some();
            state.user = user;
        }
        AuthAction::Login { user } => {
            state.is_logged_in = true;
            state.user = Some(user);
        }
        AuthAction::Logout => {
            state.is_logged_in = false;
            state.user = None;
        }
    }
    state.is_initialized = true;
}
