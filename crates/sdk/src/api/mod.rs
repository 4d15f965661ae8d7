mod authentication;
pub mod http;
mod projects;
mod refresh;
pub mod tokens;
pub mod types;
mod users;

pub use authentication::AuthenticationApi;
pub use projects::ProjectsApi;
pub use types::{ApiError, ApiResult, ClientBaseConfig};
pub use users::UsersApi;
