//! REST client for the Ticket Punch API
//!
//! `ApiClient` is the only place that knows about HTTP. It resolves paths
//! against the configured base URL, attaches `Authorization: Bearer <token>`
//! from the session store, and turns every failure into a single
//! human-readable message (`ApiError`). It implements the repository traits
//! in `users`, `projects` and `tickets`.
//!
//! No retries and no timeouts are configured.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::session::SessionStore;

mod projects;
mod tickets;
mod users;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a client for `base_url`, reading the bearer token from `session`
    pub fn new(base_url: &str, session: Arc<dyn SessionStore>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
            session,
        })
    }

    pub fn from_config(config: &Config, session: Arc<dyn SessionStore>) -> Result<Self> {
        Self::new(&config.api.base_url, session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/projects/3`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "API request");

        let mut builder = self.http.request(method, url);
        if let Some(token) = self.session.token()? {
            builder = builder.header(AUTHORIZATION, bearer(&token));
        }
        Ok(builder)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();

        if !status.is_success() {
            // Body is best-effort; some servers send none on errors
            let body = response.text().await.unwrap_or_default();
            let error = ApiError::from_status(status.as_u16(), &body);
            tracing::debug!(status = status.as_u16(), error = %error, "API request failed");
            return Err(error.into());
        }

        let value = response.json::<T>().await.map_err(ApiError::from)?;
        Ok(value)
    }

    /// Like `send`, but the response body is not needed
    async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body).into());
        }
        Ok(())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path)?;
        self.send(builder).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path)?.json(body);
        self.send(builder).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path)?.json(body);
        self.send(builder).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path)?;
        self.send_empty(builder).await
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
