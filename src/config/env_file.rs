// src/config/env_file.rs

use std::path::Path;

use tracing::{debug, info};

use crate::errors::{Result, RunCommandsError};

/// Load environment variables from a file before any command runs.
///
/// An explicit path must load; without one, a `.env` file is picked up if
/// present and failures are only logged. Variables already present in the
/// environment are never overridden.
pub fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenv::from_path(path).map_err(|e| RunCommandsError::EnvFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            info!(path = %path.display(), "loaded env file");
        }
        None => match dotenv::dotenv() {
            Ok(found) => debug!(path = %found.display(), "loaded default .env file"),
            Err(e) => debug!(error = %e, "no default .env file loaded"),
        },
    }
    Ok(())
}
