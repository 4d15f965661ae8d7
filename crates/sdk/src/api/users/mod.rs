use std::sync::Arc;

use traintrack_core::user::types::User;

use crate::api::http::HttpClient;
use crate::api::types::ApiResult;

/// User roster, used by trainers when assigning projects.
#[derive(Clone)]
pub struct UsersApi {
    client: Arc<HttpClient>,
}

impl UsersApi {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<User>> {
        self.client.get("users/").await
    }
}
