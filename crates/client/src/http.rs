//! Shared HTTP client for the dashboard API.
//!
//! Every request built here starts from the default headers. Requests outside
//! the auth endpoint family get the persisted credential, read fresh from
//! storage. Every response goes through [`ApiClient::send`], which turns
//! failures into [`ApiError`]s and is the only place a `401` tears the session
//! down. A `401` only ends the session whose credential the request carried.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::context::SessionContext;
use crate::error::{ApiError, AuthFailure, ErrorPayload};
use crate::headers::bearer_value;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    session: Arc<SessionContext>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Arc<SessionContext>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_client(http, config, session))
    }

    /// Use a preconfigured `reqwest` client (timeouts, proxies, TLS roots).
    pub fn with_client(http: reqwest::Client, config: ClientConfig, session: Arc<SessionContext>) -> Self {
        Self {
            http,
            config: Arc::new(config),
            session,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.config.resolve(path)?)
    }

    /// Start a request to `path` with default headers and credentials applied.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        let mut headers = self.session.store().headers().snapshot();

        if self.config.is_auth_url(&url) {
            headers.remove(AUTHORIZATION);
        } else if let Some(value) = self.credential() {
            headers.insert(AUTHORIZATION, value);
        }

        tracing::debug!(%method, %url, "request");
        Ok(self.http.request(method, url).headers(headers))
    }

    fn credential(&self) -> Option<HeaderValue> {
        let token = match self.session.store().get_session() {
            Ok(token) => token?,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored credential; sending request without it");
                return None;
            }
        };

        match bearer_value(&token) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(error = %err, "stored credential is not a valid header value");
                None
            }
        }
    }

    /// Send a request built by [`Self::request`] and classify the response.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let (http, request) = request.build_split();
        let request = request?;
        let sent_credential = request.headers().get(AUTHORIZATION).cloned();

        let response = http.execute(request).await.map_err(|err| {
            tracing::warn!(error = %err, "request failed before a response arrived");
            ApiError::Network(err)
        })?;
        self.intercept(response, sent_credential).await
    }

    async fn intercept(
        &self,
        response: Response,
        sent_credential: Option<HeaderValue>,
    ) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let from_auth_endpoint = self.config.is_auth_url(&url);
        let payload = response.json::<ErrorPayload>().await.ok();

        match status {
            StatusCode::UNAUTHORIZED => {
                let failure = payload
                    .as_ref()
                    .map(|p| AuthFailure::from_server_message(&p.error))
                    .unwrap_or(AuthFailure::Unauthorized);
                tracing::warn!(%url, reason = %failure, "401 from API");

                if !from_auth_endpoint {
                    if sent_credential == self.credential() {
                        self.session.force_logout(failure);
                    } else {
                        tracing::debug!(%url, "401 for a superseded credential; session kept");
                    }
                }
                Err(ApiError::Unauthorized(failure))
            }
            StatusCode::FORBIDDEN => {
                tracing::warn!(%url, "403 from API");
                Err(ApiError::PermissionDenied(payload))
            }
            _ => {
                tracing::warn!(%url, %status, error = ?payload.as_ref().map(|p| &p.error), "API request failed");
                Err(ApiError::Server { status, payload })
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        Ok(response.json().await?)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::POST, path)?.json(body))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::PUT, path)?.json(body))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::headers::DefaultHeaders;
    use crate::navigation::MemoryNavigator;
    use crate::session::SessionStore;
    use crate::storage::MemoryStorage;

    fn client() -> ApiClient {
        let config = ClientConfig::new(Url::parse("https://erp.example.com/api").unwrap());
        let store = SessionStore::new(
            Arc::new(MemoryStorage::new()),
            config.storage_key.clone(),
            DefaultHeaders::new(),
        );
        let session = Arc::new(SessionContext::new(store, Arc::new(MemoryNavigator::new()), "/"));
        ApiClient::new(config, session).unwrap()
    }

    fn authorization(client: &ApiClient, path: &str) -> Option<String> {
        let request = client.request(Method::GET, path).unwrap().build().unwrap();
        request
            .headers()
            .get(AUTHORIZATION)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[test]
    fn no_credential_no_header() {
        let client = client();
        assert_eq!(authorization(&client, "/customers"), None);
    }

    #[test]
    fn stored_credential_is_attached_to_api_requests() {
        let client = client();
        client.session().store().set_session(Some("T")).unwrap();

        assert_eq!(authorization(&client, "/customers").as_deref(), Some("Bearer T"));
    }

    #[test]
    fn auth_endpoints_never_carry_the_credential() {
        let client = client();
        client.session().store().set_session(Some("T")).unwrap();

        assert_eq!(authorization(&client, "/auth/login"), None);
        assert_eq!(authorization(&client, "/auth"), None);
    }

    #[test]
    fn credential_is_read_fresh_per_request() {
        let client = client();
        client.session().store().set_session(Some("old")).unwrap();
        assert_eq!(authorization(&client, "/roles").as_deref(), Some("Bearer old"));

        client.session().store().set_session(Some("new")).unwrap();
        assert_eq!(authorization(&client, "/roles").as_deref(), Some("Bearer new"));

        client.session().store().set_session(None).unwrap();
        assert_eq!(authorization(&client, "/roles"), None);
    }

    #[test]
    fn dot_segments_are_classified_after_resolution() {
        let client = client();
        client.session().store().set_session(Some("T")).unwrap();

        let request = client
            .request(Method::POST, "/x/../auth/login")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://erp.example.com/api/auth/login");
        assert!(request.headers().get(AUTHORIZATION).is_none());

        let request = client
            .request(Method::GET, "/auth/../customers")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://erp.example.com/api/customers");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer T");
    }

    #[test]
    fn other_default_headers_are_forwarded() {
        let client = client();
        client
            .session()
            .store()
            .headers()
            .insert("x-client".parse().unwrap(), HeaderValue::from_static("tenantdesk"));

        let request = client.request(Method::GET, "/auth/login").unwrap().build().unwrap();
        assert_eq!(request.headers()["x-client"], "tenantdesk");
        assert_eq!(request.url().as_str(), "https://erp.example.com/api/auth/login");
    }
}
