pub mod authentication;
mod environment;
mod logger;
pub mod progress;
pub mod project;
pub mod user;

pub use environment::load_env_from_project_path;
pub use logger::setup_info_logger;
