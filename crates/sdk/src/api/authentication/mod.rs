use std::sync::Arc;

use traintrack_core::authentication::types::{LoginRequest, TokenPair};
use traintrack_core::user::types::User;

use crate::api::http::HttpClient;
use crate::api::types::ApiResult;

/// Credential lifecycle: login, current-user lookup, logout.
#[derive(Clone)]
pub struct AuthenticationApi {
    client: Arc<HttpClient>,
}

impl AuthenticationApi {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a token pair and persists it under the
    /// fixed storage keys. Invalid credentials surface with the server's
    /// status and body.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenPair> {
        let pair: TokenPair =
            self.client.post_unauthenticated("token/", &LoginRequest { username, password }).await?;
        self.client.tokens().set_pair(&pair);
        tracing::debug!(username, "logged in");
        Ok(pair)
    }

    /// Profile of the authenticated principal. Also used to validate a
    /// restored session on startup.
    pub async fn current_user(&self) -> ApiResult<User> {
        self.client.get("me/").await
    }

    /// Deletes both stored tokens and signals the logout transition.
    pub fn logout(&self) {
        self.client.tokens().clear();
        self.client.signal_logout();
    }
}
