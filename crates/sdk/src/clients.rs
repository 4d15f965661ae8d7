use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use traintrack_core::user::types::User;

use crate::api::http::HttpClient;
use crate::api::tokens::{TokenStorage, TokenStore};
use crate::api::types::{ApiError, ApiResult, ClientBaseConfig};
use crate::api::{AuthenticationApi, ProjectsApi, UsersApi};

#[derive(Debug, Clone)]
pub struct CreateClientConfig {
    /// Root of the REST API, including any `/api` prefix.
    pub server_url: String,
    /// Per-request timeout override; defaults to 15 seconds.
    pub timeout: Option<Duration>,
}

/// Entry point to the tracker API: one shared authenticated transport
/// fanned out to per-resource handles.
pub struct Client {
    pub auth: AuthenticationApi,
    pub projects: ProjectsApi,
    pub users: UsersApi,
    http: Arc<HttpClient>,
}

impl Client {
    /// Client with in-memory token storage; the session lives and dies with
    /// this instance.
    pub fn new(config: CreateClientConfig) -> ApiResult<Self> {
        Self::with_token_storage(config, TokenStore::in_memory())
    }

    /// Client over caller-supplied storage, e.g. a file-backed store that
    /// persists the session across processes.
    pub fn with_storage(
        config: CreateClientConfig,
        storage: Arc<dyn TokenStorage>,
    ) -> ApiResult<Self> {
        Self::with_token_storage(config, TokenStore::new(storage))
    }

    fn with_token_storage(config: CreateClientConfig, tokens: TokenStore) -> ApiResult<Self> {
        let base = ClientBaseConfig { server_url: config.server_url, timeout: config.timeout };
        let http = Arc::new(HttpClient::new(base, tokens)?);

        Ok(Self {
            auth: AuthenticationApi::new(Arc::clone(&http)),
            projects: ProjectsApi::new(Arc::clone(&http)),
            users: UsersApi::new(Arc::clone(&http)),
            http,
        })
    }

    /// Validates a stored session on startup.
    ///
    /// Returns the authenticated user when the stored credentials (after a
    /// transparent refresh, if needed) are still accepted. A rejected
    /// session clears both tokens and yields `None`; transport faults
    /// propagate so a flaky network is not mistaken for an expired login.
    pub async fn restore_session(&self) -> ApiResult<Option<User>> {
        let tokens = self.http.tokens();
        if tokens.access_token().is_none() && tokens.refresh_token().is_none() {
            return Ok(None);
        }

        match self.auth.current_user().await {
            Ok(user) => Ok(Some(user)),
            Err(ApiError::Status { status: 401, .. }) => {
                tokens.clear();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Watch that flips to `true` when the session ends: explicit logout or
    /// irrecoverable refresh failure. Consumers route this to their
    /// unauthenticated entry point.
    pub fn on_logout(&self) -> watch::Receiver<bool> {
        self.http.logout_watch()
    }

    pub fn logged_out(&self) -> bool {
        *self.http.logout_watch().borrow()
    }
}
