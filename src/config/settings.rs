//! Library settings loaded from `library.toml`.
//!
//! The file is optional; every field has a default. `LIBRARY_OWNER_ID` in the
//! environment (or `.env`) overrides the owner id from the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Default settings file location
pub const DEFAULT_SETTINGS_PATH: &str = "library.toml";

/// Settings for the ledger binary
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Admin identity whose records are shown
    pub owner_id: String,
    /// Symbol printed in front of amounts
    pub currency_symbol: String,
    /// Name shown in the overview header
    pub library_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            owner_id: "admin".to_string(),
            currency_symbol: "₹".to_string(),
            library_name: "Library".to_string(),
        }
    }
}

impl Settings {
    /// Applies `LIBRARY_OWNER_ID` from the environment, if set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(owner_id) = std::env::var("LIBRARY_OWNER_ID") {
            self.owner_id = owner_id;
        }
        self
    }
}

/// Parses settings from TOML text
///
/// # Errors
/// Returns [`Error::Config`] if the TOML is invalid or a field has the wrong type.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings: {e}"),
    })
}

/// Loads settings from `path`, using defaults when the file does not exist.
///
/// # Errors
/// Returns [`Error::Io`] if the file exists but cannot be read, or
/// [`Error::Config`] if it cannot be parsed.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("No settings file at {:?}, using defaults", path);
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path)
        .inspect_err(|e| warn!("Failed to read settings file {}: {}", path.display(), e))?;
    parse_settings(&contents)
}

/// Loads settings from [`DEFAULT_SETTINGS_PATH`]
///
/// # Errors
/// See [`load_settings`].
pub fn load_default_settings() -> Result<Settings> {
    load_settings(DEFAULT_SETTINGS_PATH)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r#"
            owner_id = "owner-42"
            currency_symbol = "$"
            library_name = "Quiet Corner"
        "#;

        let settings = parse_settings(toml_str).unwrap();
        assert_eq!(settings.owner_id, "owner-42");
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.library_name, "Quiet Corner");
    }

    #[test]
    fn test_parse_partial_settings_uses_defaults() {
        let settings = parse_settings(r#"library_name = "Reading Room""#).unwrap();
        assert_eq!(settings.owner_id, "admin");
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.library_name, "Reading Room");
    }

    #[test]
    fn test_parse_invalid_settings() {
        let result = parse_settings("owner_id = 5");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = load_settings("definitely/not/here/library.toml").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_unreadable_settings_path_is_io_error() {
        // A directory exists but cannot be read as a file
        let result = load_settings(std::env::temp_dir());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
