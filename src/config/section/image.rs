//! `[image]` section configuration.
//!
//! Defaults for the image helper and the query parameters used by the
//! built-in image URL service.
//!
//! # Example
//!
//! ```toml
//! [image]
//! default_constraint = "none"     # used when no xpc-image-size-constraint is given
//! default_loading = "lazy"        # loading attribute when none is declared
//! passthrough = ["svg", "webp"]   # formats served as-is (never resized)
//! max_side_param = "maxsidesize"  # query parameter for max:N
//! width_param = "width"           # query parameter for width:N / size:WxH
//! height_param = "height"         # query parameter for height:N / size:WxH
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::media::SizeConstraint;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Constraint applied to `src` when the element declares none.
    pub default_constraint: SizeConstraint,

    /// Value of `loading` when the element declares none.
    pub default_loading: String,

    /// Extensions that are never resized and never get srcset/sizes.
    pub passthrough: Vec<String>,

    /// Query parameter carrying `max:N`.
    pub max_side_param: String,

    /// Query parameter carrying the width of `width:N` and `size:WxH`.
    pub width_param: String,

    /// Query parameter carrying the height of `height:N` and `size:WxH`.
    pub height_param: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            default_constraint: SizeConstraint::None,
            default_loading: "lazy".to_string(),
            passthrough: vec!["svg".to_string(), "webp".to_string()],
            max_side_param: "maxsidesize".to_string(),
            width_param: "width".to_string(),
            height_param: "height".to_string(),
        }
    }
}

impl ImageConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ext) = self
            .passthrough
            .iter()
            .find(|ext| ext.trim().is_empty() || ext.starts_with('.'))
        {
            return Err(ConfigError::Validation {
                field: "image.passthrough",
                message: format!("`{ext}` is not a bare extension (use \"svg\", not \".svg\")"),
            });
        }

        let params = [
            ("image.max_side_param", &self.max_side_param),
            ("image.width_param", &self.width_param),
            ("image.height_param", &self.height_param),
        ];
        if let Some(&(field, _)) = params.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::Validation {
                field,
                message: "query parameter name must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{XpcConfig, test_parse_config};

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.image.default_constraint, SizeConstraint::None);
        assert_eq!(config.image.default_loading, "lazy");
        assert_eq!(config.image.passthrough, ["svg", "webp"]);
        assert_eq!(config.image.max_side_param, "maxsidesize");
    }

    #[test]
    fn test_overrides() {
        let config = test_parse_config(
            "[image]\ndefault_constraint = \"width:800\"\ndefault_loading = \"eager\"\npassthrough = [\"svg\", \"gif\"]",
        );
        assert_eq!(config.image.default_constraint, SizeConstraint::Width(800));
        assert_eq!(config.image.default_loading, "eager");
        assert_eq!(config.image.passthrough, ["svg", "gif"]);
    }

    #[test]
    fn test_rejects_dotted_extension() {
        let err = XpcConfig::from_str("[image]\npassthrough = [\".svg\"]").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation { field: "image.passthrough", .. }
        ));
    }

    #[test]
    fn test_rejects_empty_param() {
        let err = XpcConfig::from_str("[image]\nwidth_param = \"\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation { field: "image.width_param", .. }
        ));
    }
}
