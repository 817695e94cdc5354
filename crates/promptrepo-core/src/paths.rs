//! Default locations for the data file.
//!
//! ```text
//! $PROMPTREPO_HOME/            (or ~/.promptrepo)
//! └── prompts.json
//! ```

use std::env;
use std::path::PathBuf;

/// File name of the persisted document.
pub const DATA_FILE_NAME: &str = "prompts.json";

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "PROMPTREPO_HOME";

/// Return the user's home directory path.
///
/// Uses HOME on Unix-like systems and USERPROFILE on Windows.
pub fn get_home_dir() -> Result<String, String> {
    if let Ok(home) = env::var("HOME") {
        if !home.is_empty() {
            return Ok(home);
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.is_empty() {
            return Ok(profile);
        }
    }

    Err("Home directory not set".to_string())
}

/// Directory holding the data file.
pub fn data_dir() -> Result<PathBuf, String> {
    if let Ok(dir) = env::var(HOME_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    Ok(PathBuf::from(get_home_dir()?).join(".promptrepo"))
}

/// Full path of the data file.
pub fn default_data_file() -> Result<PathBuf, String> {
    Ok(data_dir()?.join(DATA_FILE_NAME))
}
