//! Route gating on session state.

use crate::config::ClientConfig;
use crate::state::AuthState;

/// What a view should do given the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session check still running: show a neutral placeholder.
    Loading,
    Redirect(String),
    Render,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    login_path: String,
    home_path: String,
}

impl RouteGuard {
    pub fn new(login_path: impl Into<String>, home_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            home_path: home_path.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.login_path.clone(), config.home_path.clone())
    }

    /// Gate for views that need a logged-in user.
    pub fn protect(&self, state: &AuthState) -> GuardOutcome {
        if !state.is_initialized {
            GuardOutcome::Loading
        } else if !state.is_logged_in {
            GuardOutcome::Redirect(self.login_path.clone())
        } else {
            GuardOutcome::Render
        }
    }

    /// Gate for the login screen and other views only guests should see.
    pub fn guest(&self, state: &AuthState) -> GuardOutcome {
        if !state.is_initialized {
            GuardOutcome::Loading
        } else if state.is_logged_in {
            GuardOutcome::Redirect(self.home_path.clone())
        } else {
            GuardOutcome::Render
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> RouteGuard {
        RouteGuard::new("/", "/dashboard")
    }

    fn state(is_initialized: bool, is_logged_in: bool) -> AuthState {
        AuthState {
            is_initialized,
            is_logged_in,
            user: None,
        }
    }

    #[test]
    fn nothing_renders_before_init() {
        assert_eq!(guard().protect(&state(false, false)), GuardOutcome::Loading);
        assert_eq!(guard().guest(&state(false, false)), GuardOutcome::Loading);
    }

    #[test]
    fn protected_views() {
        assert_eq!(
            guard().protect(&state(true, false)),
            GuardOutcome::Redirect("/".to_string())
        );
        assert_eq!(guard().protect(&state(true, true)), GuardOutcome::Render);
    }

    #[test]
    fn guest_views() {
        assert_eq!(guard().guest(&state(true, false)), GuardOutcome::Render);
        assert_eq!(
            guard().guest(&state(true, true)),
            GuardOutcome::Redirect("/dashboard".to_string())
        );
    }
}
