//! Errors raised while parsing templates and binding marker payloads.

use thiserror::Error;

use crate::html::ParseError;
use crate::marker::Marker;
use crate::media::ParseConstraintError;

/// A marker attribute whose value cannot be turned into helper input.
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("invalid `{marker}` payload: {source}")]
    Payload {
        marker: Marker,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Constraint(#[from] ParseConstraintError),

    #[error("unknown image binding `{0}`")]
    UnknownImage(String),
}

/// Rendering failure.
///
/// Marker errors are only produced in strict mode; a template nested too
/// deeply is rejected in both modes.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("<{tag}>: {source}")]
    Marker {
        tag: String,
        #[source]
        source: MarkerError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_tag_and_marker() {
        let source = serde_json::from_str::<bool>("nope").unwrap_err();
        let err = RenderError::Marker {
            tag: "div".into(),
            source: MarkerError::Payload {
                marker: Marker::AttrIf,
                source,
            },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("<div>: invalid `xpc-attr-if` payload"), "{msg}");
    }

    #[test]
    fn test_unknown_image() {
        let err = MarkerError::UnknownImage("hero".into());
        assert_eq!(err.to_string(), "unknown image binding `hero`");
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let err = RenderError::from(ParseError::TooDeep {
            tag: "div".into(),
            limit: 3,
        });
        assert_eq!(err.to_string(), "<div> opens more than 3 nested elements");
    }
}
