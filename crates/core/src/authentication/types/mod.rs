mod requests;
mod token_pair;

pub use requests::{LoginRequest, RefreshRequest, RefreshResponse};
pub use token_pair::{AccessToken, RefreshToken, TokenPair};
