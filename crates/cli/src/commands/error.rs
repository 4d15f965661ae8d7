use thiserror::Error;
use traintrack::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Terminal interaction error: {0}")]
    Terminal(#[from] dialoguer::Error),
}

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Terminal interaction error: {0}")]
    Terminal(#[from] dialoguer::Error),

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
}

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("could not read report file '{path}': {source}")]
    ReportFile { path: String, source: std::io::Error },

    #[error("report path '{0}' has no file name")]
    ReportFileName(String),
}

#[derive(Error, Debug)]
pub enum CommentError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}
