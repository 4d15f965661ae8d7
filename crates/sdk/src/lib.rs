mod api;
mod clients;

pub use api::{
    ApiError, ApiResult, AuthenticationApi, ProjectsApi, UsersApi,
    tokens::{ACCESS_TOKEN_KEY, MemoryTokenStore, REFRESH_TOKEN_KEY, TokenStorage, TokenStore},
};
pub use clients::{Client, CreateClientConfig};

// the wire/domain types callers need to drive the APIs
pub use traintrack_core::authentication::types::{AccessToken, RefreshToken, TokenPair};
pub use traintrack_core::progress::types::{
    Comment, ProgressEntry, ProgressStatus, ProgressSubmission, ReportUpload,
};
pub use traintrack_core::project::types::{
    CreateMiniProject, MiniProject, Priority, ProjectFilter,
};
pub use traintrack_core::user::types::{User, UserRole};
