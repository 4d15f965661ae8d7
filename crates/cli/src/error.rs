use thiserror::Error;

use crate::commands::error::{AuthError, CommentError, ProgressError, ProjectError};
use crate::credentials::CredentialError;

/// Top-level CLI error that composes all module-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    #[error("Progress error: {0}")]
    Progress(#[from] ProgressError),

    #[error("Comment error: {0}")]
    Comment(#[from] CommentError),

    #[error("Session storage error: {0}")]
    Credentials(#[from] CredentialError),

    #[error("API error: {0}")]
    Api(#[from] traintrack::ApiError),

    #[error("Configuration error: {0}")]
    Config(String),
}
