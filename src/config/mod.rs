//! Configuration management for `xpc.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── image      # [image]
//! │   └── render     # [render]
//! ├── error          # ConfigError
//! ├── util           # config file discovery
//! └── mod.rs         # XpcConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section    | Purpose                                              |
//! |------------|------------------------------------------------------|
//! | `[render]` | Marker payload strictness                            |
//! | `[image]`  | Default constraint/loading, passthrough formats, URL params |

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{ImageConfig, RenderConfig};

use crate::log;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

/// Default config file name.
pub const CONFIG_FILE: &str = "xpc.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing xpc.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XpcConfig {
    /// Absolute path to the config file, when one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Rendering behaviour
    #[serde(default)]
    pub render: RenderConfig,

    /// Image helper settings
    #[serde(default)]
    pub image: ImageConfig,
}

impl XpcConfig {
    /// Load configuration, searching upward from cwd for `config_name`.
    ///
    /// A missing config file is not an error: defaults are used.
    pub fn load(config_name: &Path) -> Result<Self, ConfigError> {
        let Some(path) = find_config_file(config_name) else {
            crate::debug!("config"; "no {} found, using defaults", config_name.display());
            return Ok(Self::default());
        };

        let mut config = Self::from_path(&path)?;
        config.config_path = Some(path);
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Cross-field checks that serde cannot express.
    fn validate(&self) -> Result<(), ConfigError> {
        self.image.validate()
    }
}

/// Parse a config for tests, asserting that every key is known.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> XpcConfig {
    let (parsed, ignored) = XpcConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed.validate().unwrap();
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SizeConstraint;

    #[test]
    fn test_empty_config_is_default() {
        let config = test_parse_config("");
        assert_eq!(config, XpcConfig::default());
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = XpcConfig::from_str("[render\nstrict = true");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let (_, ignored) =
            XpcConfig::parse_with_ignored("[render]\nstrict = true\nshiny = 1\n[extra]\na = 1")
                .unwrap();
        assert_eq!(ignored, ["render.shiny", "extra"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[image]\ndefault_constraint = \"max:1200\"\n").unwrap();

        let config = XpcConfig::load(&path).unwrap();
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            config.image.default_constraint,
            SizeConstraint::MaxWidthOrHeight(1200)
        );
    }

    #[test]
    fn test_load_reports_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[image]\ndefault_constraint = \"huge\"\n").unwrap();

        assert!(matches!(XpcConfig::load(&path), Err(ConfigError::Toml(_))));
    }
}
