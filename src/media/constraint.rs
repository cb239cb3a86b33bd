//! Size constraints forwarded to the image URL service.
//!
//! String form (used by markers and `xpc.toml`):
//!
//! ```text
//! none           no constraint
//! max:400        fit within 400x400
//! width:400      resize to width 400
//! height:300     resize to height 300
//! size:400x300   resize to 400x300
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Resize instruction understood by an [`ImageUrlService`](super::ImageUrlService).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SizeConstraint {
    #[default]
    None,
    Width(u32),
    Height(u32),
    Size { width: u32, height: u32 },
    MaxWidthOrHeight(u32),
}

impl SizeConstraint {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid size constraint `{0}` (expected none, max:N, width:N, height:N or size:WxH)")]
pub struct ParseConstraintError(pub String);

impl FromStr for SizeConstraint {
    type Err = ParseConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseConstraintError(s.to_string());

        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }

        let (kind, value) = trimmed.split_once(':').ok_or_else(err)?;
        let dim = |v: &str| v.trim().parse::<u32>().ok().filter(|&n| n > 0);

        match kind.trim().to_ascii_lowercase().as_str() {
            "max" => dim(value).map(Self::MaxWidthOrHeight).ok_or_else(err),
            "width" => dim(value).map(Self::Width).ok_or_else(err),
            "height" => dim(value).map(Self::Height).ok_or_else(err),
            "size" => {
                let (w, h) = value.split_once(['x', 'X']).ok_or_else(err)?;
                match (dim(w), dim(h)) {
                    (Some(width), Some(height)) => Ok(Self::Size { width, height }),
                    _ => Err(err()),
                }
            }
            _ => Err(err()),
        }
    }
}

impl fmt::Display for SizeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Width(w) => write!(f, "width:{w}"),
            Self::Height(h) => write!(f, "height:{h}"),
            Self::Size { width, height } => write!(f, "size:{width}x{height}"),
            Self::MaxWidthOrHeight(m) => write!(f, "max:{m}"),
        }
    }
}

impl Serialize for SizeConstraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SizeConstraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        let cases = [
            ("none", SizeConstraint::None),
            ("", SizeConstraint::None),
            ("max:400", SizeConstraint::MaxWidthOrHeight(400)),
            (" Width: 320 ", SizeConstraint::Width(320)),
            ("height:90", SizeConstraint::Height(90)),
            ("size:400x300", SizeConstraint::Size { width: 400, height: 300 }),
        ];
        for (input, expected) in cases {
            assert_eq!(input.parse::<SizeConstraint>(), Ok(expected), "failed for {input:?}");
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["max", "max:abc", "max:0", "size:400", "depth:3", "max:-5"] {
            assert!(input.parse::<SizeConstraint>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_display_parses_back() {
        let c = SizeConstraint::Size { width: 8, height: 9 };
        assert_eq!(c.to_string(), "size:8x9");
        assert_eq!(c.to_string().parse::<SizeConstraint>(), Ok(c));
    }

    #[test]
    fn test_serde_string_form() {
        let c: SizeConstraint = serde_json::from_str("\"max:64\"").unwrap();
        assert_eq!(c, SizeConstraint::MaxWidthOrHeight(64));
        assert!(serde_json::from_str::<SizeConstraint>("\"huge\"").is_err());
    }
}
