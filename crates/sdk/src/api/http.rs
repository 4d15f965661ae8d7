use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::watch;
use traintrack_core::authentication::types::{AccessToken, RefreshRequest, RefreshResponse};

use crate::api::refresh::{RefreshCoordinator, RefreshTicket};
use crate::api::tokens::TokenStore;
use crate::api::types::{ApiError, ApiResult, ClientBaseConfig};

/// Stock per-request timeout. Expiry surfaces as a network fault and never
/// enters the refresh path.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Authenticated HTTP transport shared by every resource API.
///
/// Attaches the stored bearer credential to outgoing requests and, on an
/// authentication fault, obtains a new access token exactly once per
/// concurrent failure burst before replaying the affected requests. All
/// API-calling code routes through here; nothing else touches the network.
pub struct HttpClient {
    client: Client,
    base_url: String,
    tokens: TokenStore,
    refresh: RefreshCoordinator,
    logout_tx: watch::Sender<bool>,
}

impl HttpClient {
    pub fn new(config: ClientBaseConfig, tokens: TokenStore) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|err| ApiError::Config(format!("failed to build HTTP client: {err}")))?;
        let (logout_tx, _) = watch::channel(false);

        Ok(Self {
            client,
            base_url: config.server_url,
            tokens,
            refresh: RefreshCoordinator::new(),
            logout_tx,
        })
    }

    pub(crate) fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Receiver that flips to `true` when the session becomes unusable:
    /// irrecoverable refresh failure or an explicit logout.
    pub(crate) fn logout_watch(&self) -> watch::Receiver<bool> {
        self.logout_tx.subscribe()
    }

    pub(crate) fn signal_logout(&self) {
        let _ = self.logout_tx.send(true);
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.trim_start_matches('/'))
    }

    /// Central authenticated dispatch.
    ///
    /// The request is built fresh per attempt so a replay after refresh gets
    /// a complete body again (multipart uploads are not otherwise
    /// re-sendable). A request is retried at most once: if the replay also
    /// comes back 401, that fault is propagated.
    async fn execute<F>(&self, build: F) -> ApiResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut retried = false;
        loop {
            let mut request = build(&self.client);
            if let Some(token) = self.tokens.access_token() {
                request = request.bearer_auth(token.as_str());
            }

            let response = request.send().await.map_err(ApiError::from_transport)?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED
                && !retried
                && self.tokens.refresh_token().is_some()
            {
                retried = true;
                self.fresh_access_token().await?;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.map_err(ApiError::from_transport)?;
                return Err(ApiError::Status { status: status.as_u16(), body });
            }

            return Ok(response);
        }
    }

    /// Resolves once a usable access token is available, running the refresh
    /// exchange single-flight: the first faulted request leads, every other
    /// concurrent one parks on the coordinator and resumes with the shared
    /// outcome.
    async fn fresh_access_token(&self) -> ApiResult<AccessToken> {
        match self.refresh.begin() {
            RefreshTicket::Waiter(receiver) => receiver.await.map_err(|_| ApiError::Network {
                message: "refresh coordinator dropped before settling".to_string(),
            })?,
            RefreshTicket::Leader => {
                let outcome = self.refresh_exchange().await;
                match &outcome {
                    Ok(token) => {
                        self.tokens.set_access(token);
                        tracing::debug!("access token refreshed");
                    }
                    Err(err) => {
                        self.tokens.clear();
                        tracing::debug!(error = %err, "token refresh failed, ending session");
                        let _ = self.logout_tx.send(true);
                    }
                }
                self.refresh.settle(outcome.clone());
                outcome
            }
        }
    }

    /// One exchange against the refresh endpoint, on a bare transport so its
    /// own 401 cannot recurse into the fault handler. The refresh token is
    /// reused, not rotated.
    async fn refresh_exchange(&self) -> ApiResult<AccessToken> {
        let refresh = self
            .tokens
            .refresh_token()
            .ok_or_else(|| ApiError::Config("no refresh token stored".to_string()))?;

        let response = self
            .client
            .post(self.build_url("token/refresh/"))
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(ApiError::from_transport)?;
            return Err(ApiError::Status { status: status.as_u16(), body });
        }

        let parsed: RefreshResponse =
            response.json().await.map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(parsed.access)
    }

    async fn decode<T>(response: Response) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        response.json::<T>().await.map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub async fn get<T>(&self, endpoint: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.build_url(endpoint);
        let response = self.execute(|client| client.get(&url)).await?;
        Self::decode(response).await
    }

    pub async fn get_with_query<T, Q>(&self, endpoint: &str, query: Option<&Q>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let url = self.build_url(endpoint);
        let response = self
            .execute(|client| {
                let mut request = client.get(&url);
                if let Some(query) = query {
                    request = request.query(query);
                }
                request
            })
            .await?;
        Self::decode(response).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.build_url(endpoint);
        let response = self.execute(|client| client.post(&url).json(body)).await?;
        Self::decode(response).await
    }

    pub async fn post_status<B>(&self, endpoint: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize,
    {
        let url = self.build_url(endpoint);
        self.execute(|client| client.post(&url).json(body)).await?;
        Ok(())
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.build_url(endpoint);
        let response = self.execute(|client| client.put(&url).json(body)).await?;
        Self::decode(response).await
    }

    pub async fn patch_multipart<T, F>(&self, endpoint: &str, form: F) -> ApiResult<T>
    where
        T: DeserializeOwned,
        F: Fn() -> reqwest::multipart::Form,
    {
        let url = self.build_url(endpoint);
        let response = self.execute(|client| client.patch(&url).multipart(form())).await?;
        Self::decode(response).await
    }

    pub async fn delete_status(&self, endpoint: &str) -> ApiResult<()> {
        let url = self.build_url(endpoint);
        self.execute(|client| client.delete(&url)).await?;
        Ok(())
    }

    /// Bare POST used by the credential endpoints; never carries a bearer
    /// and never enters the fault handler.
    pub async fn post_unauthenticated<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let response = self
            .client
            .post(self.build_url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(ApiError::from_transport)?;
            return Err(ApiError::Status { status: status.as_u16(), body });
        }

        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::{Value, json};
    use traintrack_core::authentication::types::{RefreshToken, TokenPair};

    fn client_for(server: &MockServer, timeout: Option<Duration>) -> HttpClient {
        HttpClient::new(
            ClientBaseConfig { server_url: server.base_url(), timeout },
            TokenStore::in_memory(),
        )
        .expect("client builds")
    }

    fn seed_session(client: &HttpClient) {
        client.tokens().set_pair(&TokenPair {
            access: AccessToken::new("tokA"),
            refresh: RefreshToken::new("tokR"),
        });
    }

    #[tokio::test]
    async fn refresh_redispatches_original_request_with_new_token() {
        let server = MockServer::start_async().await;
        let stale = server.mock(|when, then| {
            when.method(GET).path("/mini-projects/").header("authorization", "Bearer tokA");
            then.status(401).json_body(json!({"detail": "token expired"}));
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/token/refresh/").json_body(json!({"refresh": "tokR"}));
            then.status(200).json_body(json!({"access": "tokB"}));
        });
        let fresh = server.mock(|when, then| {
            when.method(GET).path("/mini-projects/").header("authorization", "Bearer tokB");
            then.status(200).json_body(json!([]));
        });

        let client = client_for(&server, None);
        seed_session(&client);

        let listed: Value = client.get("mini-projects/").await.expect("retry succeeds");
        assert_eq!(listed, json!([]));

        stale.assert_hits(1);
        refresh.assert_hits(1);
        fresh.assert_hits(1);

        // new access token persisted, refresh token not rotated
        assert_eq!(client.tokens().access_token().unwrap().as_str(), "tokB");
        assert_eq!(client.tokens().refresh_token().unwrap().as_str(), "tokR");
    }

    #[tokio::test]
    async fn concurrent_faults_share_a_single_refresh_exchange() {
        let server = MockServer::start_async().await;
        let stale = server.mock(|when, then| {
            when.method(GET).path("/mini-projects/").header("authorization", "Bearer tokA");
            then.status(401);
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/token/refresh/").json_body(json!({"refresh": "tokR"}));
            // long enough for every faulted request to join the waiter queue
            then.status(200).delay(Duration::from_millis(500)).json_body(json!({"access": "tokB"}));
        });
        let fresh = server.mock(|when, then| {
            when.method(GET).path("/mini-projects/").header("authorization", "Bearer tokB");
            then.status(200).json_body(json!([]));
        });

        let client = client_for(&server, None);
        seed_session(&client);

        let results = tokio::join!(
            client.get::<Value>("mini-projects/"),
            client.get::<Value>("mini-projects/"),
            client.get::<Value>("mini-projects/"),
            client.get::<Value>("mini-projects/"),
            client.get::<Value>("mini-projects/"),
        );

        for result in [results.0, results.1, results.2, results.3, results.4] {
            assert_eq!(result.expect("every parked request is replayed"), json!([]));
        }

        stale.assert_hits(5);
        refresh.assert_hits(1);
        fresh.assert_hits(5);
    }

    #[tokio::test]
    async fn request_is_never_retried_more_than_once() {
        let server = MockServer::start_async().await;
        let always_denied = server.mock(|when, then| {
            when.method(GET).path("/mini-projects/9/");
            then.status(401).json_body(json!({"detail": "nope"}));
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/token/refresh/");
            then.status(200).json_body(json!({"access": "tokB"}));
        });

        let client = client_for(&server, None);
        seed_session(&client);

        let err = client.get::<Value>("mini-projects/9/").await.unwrap_err();
        assert_eq!(err.status(), Some(401));

        // one original attempt plus exactly one replay
        always_denied.assert_hits(2);
        refresh.assert_hits(1);
    }

    #[tokio::test]
    async fn failed_refresh_clears_tokens_and_signals_logout() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/me/");
            then.status(401).json_body(json!({"detail": "resource denied"}));
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/token/refresh/");
            then.status(401).json_body(json!({"detail": "Token is invalid or expired"}));
        });

        let client = client_for(&server, None);
        seed_session(&client);
        let logout = client.logout_watch();
        assert!(!*logout.borrow());

        let err = client.get::<Value>("me/").await.unwrap_err();
        // the caller receives the refresh fault, not the original 401
        assert_eq!(err.detail().as_deref(), Some("Token is invalid or expired"));

        refresh.assert_hits(1);
        assert!(client.tokens().access_token().is_none());
        assert!(client.tokens().refresh_token().is_none());
        assert!(*logout.borrow());
    }

    #[tokio::test]
    async fn waiters_receive_the_refresh_fault() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/mini-projects/").header("authorization", "Bearer tokA");
            then.status(401);
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/token/refresh/");
            then.status(401)
                .delay(Duration::from_millis(500))
                .json_body(json!({"detail": "Token is invalid or expired"}));
        });

        let client = client_for(&server, None);
        seed_session(&client);

        let results = tokio::join!(
            client.get::<Value>("mini-projects/"),
            client.get::<Value>("mini-projects/"),
            client.get::<Value>("mini-projects/"),
        );

        for result in [results.0, results.1, results.2] {
            let err = result.unwrap_err();
            assert_eq!(err.detail().as_deref(), Some("Token is invalid or expired"));
        }

        refresh.assert_hits(1);
        assert!(client.tokens().access_token().is_none());
        assert!(client.tokens().refresh_token().is_none());
    }

    #[tokio::test]
    async fn timeout_is_a_network_fault_and_never_triggers_refresh() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/mini-projects/");
            then.status(200).delay(Duration::from_secs(2)).json_body(json!([]));
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/token/refresh/");
            then.status(200).json_body(json!({"access": "tokB"}));
        });

        let client = client_for(&server, Some(Duration::from_millis(200)));
        seed_session(&client);

        let err = client.get::<Value>("mini-projects/").await.unwrap_err();
        assert!(err.is_network_fault());

        refresh.assert_hits(0);
        // credentials survive a transport fault
        assert_eq!(client.tokens().access_token().unwrap().as_str(), "tokA");
    }

    #[tokio::test]
    async fn missing_refresh_token_passes_the_fault_through() {
        let server = MockServer::start_async().await;
        let denied = server.mock(|when, then| {
            when.method(GET).path("/me/");
            then.status(401).json_body(json!({"detail": "no credentials"}));
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/token/refresh/");
            then.status(200).json_body(json!({"access": "tokB"}));
        });

        let client = client_for(&server, None);

        let err = client.get::<Value>("me/").await.unwrap_err();
        assert_eq!(err.status(), Some(401));

        denied.assert_hits(1);
        refresh.assert_hits(0);
    }

    #[tokio::test]
    async fn other_http_faults_pass_through_untouched() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/mini-projects/4/");
            then.status(403).json_body(json!({"detail": "trainers only"}));
        });
        let refresh = server.mock(|when, then| {
            when.method(POST).path("/token/refresh/");
            then.status(200).json_body(json!({"access": "tokB"}));
        });

        let client = client_for(&server, None);
        seed_session(&client);

        let err = client.get::<Value>("mini-projects/4/").await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.detail().as_deref(), Some("trainers only"));
        refresh.assert_hits(0);
    }
}
