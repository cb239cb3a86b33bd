//! `[render]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [render]
//! strict = false   # true = abort on an undecodable marker payload
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fail the render when a marker payload cannot be decoded or an image
    /// binding is unknown. When false the marker is dropped with a warning.
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(!config.render.strict);
    }

    #[test]
    fn test_strict() {
        let config = test_parse_config("[render]\nstrict = true");
        assert!(config.render.strict);
    }
}
