//! Centralized path resolution for catval
//!
//! # Environment Variables
//!
//! - `CATVAL_CONFIG_DIR` - Override config directory (provider.toml, declarations)
//! - `CATVAL_STATE_DIR` - Override state directory (state.toml)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `CATVAL_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/catval` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\catval`
//!    - macOS/Linux: `~/.config/catval`
//!
//! For state_dir():
//! 1. `CATVAL_STATE_DIR` environment variable
//! 2. `XDG_STATE_HOME/catval` (if set)
//! 3. Platform default:
//!    - Windows: `%LOCALAPPDATA%\catval`
//!    - macOS/Linux: `~/.local/state/catval`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "CATVAL_CONFIG_DIR";

/// Environment variable for state directory override
pub const ENV_STATE_DIR: &str = "CATVAL_STATE_DIR";

/// Default name of the declaration file inside the config directory
pub const DECLARATIONS_FILE: &str = "category_values.toml";

/// Name of the provider settings file inside the config directory
pub const PROVIDER_FILE: &str = "provider.toml";

/// Name of the state file inside the state directory
pub const STATE_FILE: &str = "state.toml";

/// Get the catval config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("catval");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join("catval");
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("catval");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Get the catval state directory path
pub fn state_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_STATE_DIR) {
        let path = expand(&dir);
        log::debug!("Using state dir from {}: {}", ENV_STATE_DIR, path.display());
        return Ok(path);
    }

    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        let path = PathBuf::from(xdg_state).join("catval");
        log::debug!("Using XDG_STATE_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(local_app_data) = dirs::data_local_dir() {
            let path = local_app_data.join("catval");
            log::debug!("Using Windows state dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".local").join("state").join("catval");
    log::debug!("Using default state dir: {}", path.display());
    Ok(path)
}

/// Resolve the declaration file: an explicit path wins over the default.
pub fn declarations_file(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand(path)),
        None => Ok(config_dir()?.join(DECLARATIONS_FILE)),
    }
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Run `f` with `key` set to `value`, restoring the previous value after.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: each test touches its own variable
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: as above
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    #[test]
    fn test_config_dir_env_override() {
        with_env_var(ENV_CONFIG_DIR, "/custom/config/path", || {
            let result = config_dir().unwrap();
            assert_eq!(result, PathBuf::from("/custom/config/path"));
        });
    }

    #[test]
    fn test_state_dir_env_override() {
        with_env_var(ENV_STATE_DIR, "/custom/state/path", || {
            let result = state_dir().unwrap();
            assert_eq!(result, PathBuf::from("/custom/state/path"));
        });
    }

    #[test]
    fn test_declarations_file_explicit() {
        let result = declarations_file(Some("/srv/catval/values.toml")).unwrap();
        assert_eq!(result, PathBuf::from("/srv/catval/values.toml"));
    }

    #[test]
    fn test_expand_with_tilde() {
        let result = expand("~/test/path");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("test").join("path"));
    }

    #[test]
    fn test_expand_absolute() {
        let result = expand("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_with_env_var() {
        with_env_var("CATVAL_TEST_VAR", "test_value", || {
            let result = expand("/path/$CATVAL_TEST_VAR/file");
            assert_eq!(result, PathBuf::from("/path/test_value/file"));
        });
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$NONEXISTENT_VAR_12345/file");
        assert_eq!(result, PathBuf::from("/path/$NONEXISTENT_VAR_12345/file"));
    }
}
