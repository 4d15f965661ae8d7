use serde::{Deserialize, Serialize};

use super::{AccessToken, RefreshToken};

/// Payload for the token endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Payload for the refresh endpoint.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a RefreshToken,
}

/// The refresh endpoint returns a new access token only; the refresh token
/// is not rotated.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: AccessToken,
}
