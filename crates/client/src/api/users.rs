use reqwest::{Method, RequestBuilder};
use sesplan_core::errors::SesplanResult;
use sesplan_core::models::user::{LoginCredentials, LoginResponse, User, UserCreate};
use tracing::info;

use crate::{require_non_empty, ApiClient};

impl ApiClient {
    /// Exchanges credentials for a bearer token (`POST /auth/token`, form encoded).
    pub async fn request_token(&self, credentials: &LoginCredentials) -> SesplanResult<LoginResponse> {
        require_non_empty("username", &credentials.username)?;
        require_non_empty("password", &credentials.password)?;

        let response: LoginResponse = self.send_json(self.token_request(credentials)).await?;
        info!("Obtained {} token for {}", response.token_type, credentials.username);
        Ok(response)
    }

    pub(crate) fn token_request(&self, credentials: &LoginCredentials) -> RequestBuilder {
        self.request(Method::POST, "/auth/token").form(&[
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ])
    }

    pub async fn current_user(&self) -> SesplanResult<User> {
        self.get("/users/me").await
    }

    pub async fn register(&self, user: &UserCreate) -> SesplanResult<User> {
        require_non_empty("username", &user.username)?;
        require_non_empty("email", &user.email)?;
        require_non_empty("password", &user.password)?;
        self.post("/users/", user).await
    }
}
