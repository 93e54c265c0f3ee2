//! # Sesplan Client
//!
//! Async client for the campaign-planner REST API. [`ApiClient`] owns the HTTP
//! connection pool, the configuration and the bearer token; endpoint groups are
//! added to it by the modules under [`api`]. On top of that sit the explicit
//! auth session ([`auth::AuthSession`]), the availability commit protocol
//! ([`actions`]) and the "my availability" state container
//! ([`my_availability::MyAvailability`]).

pub mod actions;
pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
pub mod mock;
pub mod my_availability;

use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use sesplan_core::errors::{SesplanError, SesplanResult};
use tracing::debug;

use crate::config::ClientConfig;
use crate::middleware::{auth::attach_bearer, error_handling};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    token: Option<String>,
}

impl ApiClient {
    /// Creates an unauthenticated client.
    pub fn new(config: ClientConfig) -> SesplanResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(error_handling::from_reqwest)?;

        Ok(Self {
            http,
            config,
            token: None,
        })
    }

    /// Returns a copy of this client that sends `token` as its bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.api_url(path);
        debug!("{} {}", method, url);
        attach_bearer(self.http.request(method, url), self.token.as_deref())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> SesplanResult<T> {
        let response = request.send().await.map_err(error_handling::from_reqwest)?;
        let response = error_handling::check_response(response).await?;
        response.json::<T>().await.map_err(error_handling::from_reqwest)
    }

    async fn send_empty(&self, request: RequestBuilder) -> SesplanResult<()> {
        let response = request.send().await.map_err(error_handling::from_reqwest)?;
        error_handling::check_response(response).await?;
        Ok(())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> SesplanResult<T> {
        self.send_json(self.request(Method::GET, path)).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> SesplanResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send_json(self.request(Method::GET, path).query(query)).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> SesplanResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, path).json(body)).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> SesplanResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::PUT, path).json(body)).await
    }

    /// DELETE whose response body is returned to the caller.
    pub(crate) async fn delete_returning<T: DeserializeOwned>(&self, path: &str) -> SesplanResult<T> {
        self.send_json(self.request(Method::DELETE, path)).await
    }

    /// DELETE whose response body, if any, is ignored.
    pub(crate) async fn delete<Q>(&self, path: &str, query: Option<&Q>) -> SesplanResult<()>
    where
        Q: Serialize + ?Sized,
    {
        self.send_empty(self.delete_request(path, query)).await
    }

    fn delete_request<Q>(&self, path: &str, query: Option<&Q>) -> RequestBuilder
    where
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::DELETE, path);
        match query {
            Some(query) => request.query(query),
            None => request,
        }
    }
}

/// Rejects non-positive ids before any request is made.
pub(crate) fn require_id(name: &str, id: i64) -> SesplanResult<()> {
    if id <= 0 {
        return Err(SesplanError::Validation(format!("{} must be a positive id, got {}", name, id)));
    }
    Ok(())
}

/// Rejects empty required strings before any request is made.
pub(crate) fn require_non_empty(name: &str, value: &str) -> SesplanResult<()> {
    if value.trim().is_empty() {
        return Err(SesplanError::Validation(format!("{} must not be empty", name)));
    }
    Ok(())
}
