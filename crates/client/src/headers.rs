//! Process-wide default request headers.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};

/// Shared handle to the headers every outgoing request starts from.
///
/// Clones share the same map. Writes are visible to the next request built by
/// any [`crate::ApiClient`] holding a clone.
#[derive(Debug, Clone, Default)]
pub struct DefaultHeaders {
    inner: Arc<RwLock<HeaderMap>>,
}

/// `Bearer <token>`, marked sensitive so it never shows up in debug output.
pub fn bearer_value(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    value.set_sensitive(true);
    Ok(value)
}

impl DefaultHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: HeaderName, value: HeaderValue) {
        self.write().insert(name, value);
    }

    pub fn remove(&self, name: &HeaderName) {
        self.write().remove(name);
    }

    pub fn get(&self, name: &HeaderName) -> Option<HeaderValue> {
        self.read().get(name).cloned()
    }

    pub fn authorization(&self) -> Option<HeaderValue> {
        self.get(&AUTHORIZATION)
    }

    /// Copy of the current map, to seed a single request.
    pub fn snapshot(&self) -> HeaderMap {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HeaderMap> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HeaderMap> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let headers = DefaultHeaders::new();
        let other = headers.clone();

        headers.insert(AUTHORIZATION, bearer_value("T").unwrap());
        assert_eq!(other.authorization().unwrap(), "Bearer T");

        other.remove(&AUTHORIZATION);
        assert!(headers.authorization().is_none());
        assert!(!headers.snapshot().contains_key(AUTHORIZATION));
    }

    #[test]
    fn bearer_value_is_sensitive() {
        let value = bearer_value("abc").unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value, "Bearer abc");
    }

    #[test]
    fn bearer_value_rejects_control_characters() {
        assert!(bearer_value("line\nbreak").is_err());
    }
}
