//! Client configuration.

use thiserror::Error;
use url::Url;

use tenantdesk_core::DomainError;

pub const API_URL_ENV: &str = "TENANTDESK_API_URL";
pub const AUTH_PREFIX_ENV: &str = "TENANTDESK_AUTH_PREFIX";
pub const STORAGE_KEY_ENV: &str = "TENANTDESK_STORAGE_KEY";
pub const HOME_PATH_ENV: &str = "TENANTDESK_HOME_PATH";

const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Where the backend lives and how the client names its routes and storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API. Request paths are appended to it verbatim,
    /// so a base with a path (`https://host/api`) keeps that path.
    pub api_base_url: Url,

    /// Path prefix of the authentication endpoint family (`/auth`).
    pub auth_path_prefix: String,

    /// Storage key of the persisted credential.
    pub storage_key: String,

    /// Login entry point; also the forced-logout landing page.
    pub login_path: String,

    /// Where logged-in users are sent when they open a guest-only view.
    pub home_path: String,
}

impl ClientConfig {
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            auth_path_prefix: "/auth".to_string(),
            storage_key: "access_token".to_string(),
            login_path: "/".to_string(),
            home_path: "/dashboard".to_string(),
        }
    }

    /// Build the configuration from `TENANTDESK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| {
            tracing::warn!("{API_URL_ENV} not set; using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });
        let api_base_url = Url::parse(&api_url).map_err(|source| ConfigError::InvalidUrl {
            var: API_URL_ENV,
            source,
        })?;

        let mut config = Self::new(api_base_url);
        if let Ok(prefix) = std::env::var(AUTH_PREFIX_ENV) {
            config = config.with_auth_path_prefix(prefix)?;
        }
        if let Ok(key) = std::env::var(STORAGE_KEY_ENV) {
            config = config.with_storage_key(key)?;
        }
        if let Ok(home) = std::env::var(HOME_PATH_ENV) {
            config = config.with_home_path(home)?;
        }
        Ok(config)
    }

    pub fn with_auth_path_prefix(mut self, prefix: impl Into<String>) -> Result<Self, DomainError> {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        if !trimmed.starts_with('/') {
            return Err(DomainError::validation(format!(
                "auth path prefix must be absolute, got {prefix:?}"
            )));
        }
        self.auth_path_prefix = trimmed.to_string();
        Ok(self)
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Result<Self, DomainError> {
        let key = key.into();
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(DomainError::validation(format!("unusable storage key {key:?}")));
        }
        self.storage_key = key;
        Ok(self)
    }

    pub fn with_home_path(mut self, path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(DomainError::validation(format!(
                "home path must be absolute, got {path:?}"
            )));
        }
        self.home_path = path;
        Ok(self)
    }

    /// Path of the credential-exchange endpoint.
    pub fn login_endpoint(&self) -> String {
        format!("{}/login", self.auth_path_prefix)
    }

    /// Resolve an API path against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.api_base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
    }

    /// Whether `path` (relative to the API base) is part of the auth family.
    pub fn is_auth_path(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = format!("/{}", path.trim_start_matches('/'));
        let prefix = self.auth_path_prefix.as_str();

        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// [`Self::is_auth_path`] for a fully resolved URL.
    pub fn is_auth_url(&self, url: &Url) -> bool {
        let base_path = self.api_base_url.path().trim_end_matches('/');
        match url.path().strip_prefix(base_path) {
            Some(relative) => self.is_auth_path(relative),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> ClientConfig {
        ClientConfig::new(Url::parse(base).unwrap())
    }

    #[test]
    fn defaults() {
        let cfg = config("http://localhost:8080");
        assert_eq!(cfg.login_endpoint(), "/auth/login");
        assert_eq!(cfg.storage_key, "access_token");
        assert_eq!(cfg.login_path, "/");
    }

    #[test]
    fn resolve_keeps_base_path() {
        let cfg = config("https://erp.example.com/api/");
        assert_eq!(
            cfg.resolve("/customers?page=2").unwrap().as_str(),
            "https://erp.example.com/api/customers?page=2"
        );
        assert_eq!(
            cfg.resolve("tenants").unwrap().as_str(),
            "https://erp.example.com/api/tenants"
        );
    }

    #[test]
    fn auth_family_matches_on_segment_boundary() {
        let cfg = config("http://localhost:8080");
        assert!(cfg.is_auth_path("/auth"));
        assert!(cfg.is_auth_path("/auth/login"));
        assert!(cfg.is_auth_path("auth/login?next=/"));
        assert!(!cfg.is_auth_path("/authors"));
        assert!(!cfg.is_auth_path("/users/auth"));
        assert!(!cfg.is_auth_path("/"));
    }

    #[test]
    fn auth_url_is_matched_relative_to_base() {
        let cfg = config("https://erp.example.com/api");
        assert!(cfg.is_auth_url(&cfg.resolve("/auth/login").unwrap()));
        assert!(!cfg.is_auth_url(&cfg.resolve("/roles").unwrap()));
    }

    #[test]
    fn custom_prefix_is_normalized() {
        let cfg = config("http://localhost:8080")
            .with_auth_path_prefix("/session/")
            .unwrap();
        assert_eq!(cfg.login_endpoint(), "/session/login");
        assert!(cfg.is_auth_path("/session/login"));
        assert!(!cfg.is_auth_path("/auth/login"));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let cfg = config("http://localhost:8080");
        assert!(cfg.clone().with_auth_path_prefix("auth").is_err());
        assert!(cfg.clone().with_storage_key("../token").is_err());
        assert!(cfg.clone().with_storage_key("").is_err());
        assert!(cfg.with_home_path("dashboard").is_err());
    }
}
