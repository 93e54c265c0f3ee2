//! Explicit authentication context.
//!
//! An [`AuthSession`] is created by logging in or by restoring a stored token,
//! and is handed to whatever needs an authenticated client. Dropping it leaves
//! the stored token in place; [`AuthSession::logout`] removes it.

use sesplan_core::errors::{SesplanError, SesplanResult};
use sesplan_core::models::user::{LoginCredentials, User};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::middleware::auth::TokenStore;
use crate::ApiClient;

#[derive(Debug, Clone)]
pub struct AuthSession {
    client: ApiClient,
    user: User,
    store: TokenStore,
}

impl AuthSession {
    /// Logs in, persists the token and loads the current user.
    ///
    /// On any failure after the token was obtained, the stored token is cleared.
    pub async fn login(config: ClientConfig, credentials: &LoginCredentials) -> SesplanResult<Self> {
        let store = TokenStore::new(config.token_path.clone());
        let anonymous = ApiClient::new(config)?;

        let token = match anonymous.request_token(credentials).await {
            Ok(response) => response.access_token,
            Err(e) => {
                store.clear()?;
                return Err(e);
            }
        };

        let client = anonymous.with_token(token.clone());
        let result = async {
            store.save(&token)?;
            client.current_user().await
        }
        .await;

        match result {
            Ok(user) => {
                info!("Logged in as {}", user.username);
                Ok(Self { client, user, store })
            }
            Err(e) => {
                store.clear()?;
                Err(e)
            }
        }
    }

    /// Resumes a previous login from the token store.
    ///
    /// Returns `Ok(None)` when there is no stored token, or when the server
    /// rejects it, in which case the stale token is removed.
    pub async fn restore(config: ClientConfig) -> SesplanResult<Option<Self>> {
        let store = TokenStore::new(config.token_path.clone());
        let Some(token) = store.load()? else {
            return Ok(None);
        };

        let client = ApiClient::new(config)?.with_token(token);
        match client.current_user().await {
            Ok(user) => Ok(Some(Self { client, user, store })),
            Err(e @ (SesplanError::Authentication(_) | SesplanError::Authorization(_))) => {
                warn!("Stored token rejected: {}", e);
                store.clear()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Ends the session and forgets the stored token.
    pub fn logout(self) -> SesplanResult<()> {
        self.store.clear()?;
        info!("Logged out {}", self.user.username);
        Ok(())
    }
}
