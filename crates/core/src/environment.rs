use std::path::Path;

use dotenvy::{dotenv, from_path};

/// Loads environment variables from a `.env` file in the given directory,
/// falling back to the current working directory / system environment when
/// no project-local file exists.
pub fn load_env_from_project_path(project_path: &Path) {
    if from_path(project_path.join(".env")).is_err() {
        dotenv().ok();
    }
}
