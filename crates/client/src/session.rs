//! Persisted credential and default `Authorization` header, kept in lockstep.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;

use crate::error::SessionError;
use crate::headers::{DefaultHeaders, bearer_value};
use crate::storage::CredentialStorage;

/// Sole owner of the persisted credential slot.
///
/// Every write goes through [`SessionStore::set_session`], which updates the
/// storage slot and the default header together.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn CredentialStorage>,
    key: String,
    headers: DefaultHeaders,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn CredentialStorage>, key: impl Into<String>, headers: DefaultHeaders) -> Self {
        Self {
            storage,
            key: key.into(),
            headers,
        }
    }

    pub fn headers(&self) -> &DefaultHeaders {
        &self.headers
    }

    /// Install `token` as the current credential, or tear it down with `None`.
    ///
    /// With a token the header value is built first, so a token that cannot be
    /// sent never reaches storage. Without one the header is cleared even when
    /// removing the slot fails; the storage error is still returned.
    pub fn set_session(&self, token: Option<&str>) -> Result<(), SessionError> {
        match token {
            Some(token) => {
                let value = bearer_value(token)?;
                self.storage.set(&self.key, token)?;
                self.headers.insert(AUTHORIZATION, value);
                tracing::debug!(key = %self.key, "credential stored");
            }
            None => {
                let removed = self.storage.remove(&self.key);
                self.headers.remove(&AUTHORIZATION);
                removed?;
                tracing::debug!(key = %self.key, "credential cleared");
            }
        }
        Ok(())
    }

    /// Read the persisted credential. An empty slot reads as absent.
    pub fn get_session(&self) -> Result<Option<String>, SessionError> {
        let token = self.storage.get(&self.key)?;
        Ok(token.filter(|t| !t.is_empty()))
    }
}
