//! Resized-image URL construction.

use url::form_urlencoded;

use super::{SizeConstraint, is_passthrough, split_path};
use crate::config::ImageConfig;

/// Builds the URL of a resized variant of an image.
///
/// Implementations must return the input path unchanged for formats they
/// cannot resize.
pub trait ImageUrlService {
    fn constrain(&self, relative_path: &str, constraint: SizeConstraint) -> String;
}

/// Encodes constraints as query parameters understood by the media handler.
///
/// `/media/a.jpg` + `max:400` -> `/media/a.jpg?maxsidesize=400`
#[derive(Debug, Clone)]
pub struct QueryImageService {
    max_side_param: String,
    width_param: String,
    height_param: String,
    passthrough: Vec<String>,
}

impl Default for QueryImageService {
    fn default() -> Self {
        Self::from_config(&ImageConfig::default())
    }
}

impl QueryImageService {
    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            max_side_param: config.max_side_param.clone(),
            width_param: config.width_param.clone(),
            height_param: config.height_param.clone(),
            passthrough: config.passthrough.clone(),
        }
    }

    fn params(&self, constraint: SizeConstraint) -> Vec<(&str, u32)> {
        match constraint {
            SizeConstraint::None => vec![],
            SizeConstraint::Width(w) => vec![(self.width_param.as_str(), w)],
            SizeConstraint::Height(h) => vec![(self.height_param.as_str(), h)],
            SizeConstraint::Size { width, height } => {
                vec![(self.width_param.as_str(), width), (self.height_param.as_str(), height)]
            }
            SizeConstraint::MaxWidthOrHeight(m) => vec![(self.max_side_param.as_str(), m)],
        }
    }

    /// Whether a raw `key[=value]` query segment sets one of our parameters.
    fn is_constraint_segment(&self, segment: &str) -> bool {
        form_urlencoded::parse(segment.as_bytes())
            .next()
            .is_some_and(|(key, _)| {
                key == self.max_side_param || key == self.width_param || key == self.height_param
            })
    }
}

impl ImageUrlService for QueryImageService {
    fn constrain(&self, relative_path: &str, constraint: SizeConstraint) -> String {
        if constraint.is_none() || is_passthrough(relative_path, &self.passthrough) {
            return relative_path.to_string();
        }

        let (base, query, fragment) = split_path(relative_path);

        // Keep unrelated parameters as written, replace any previous constraint
        let kept = query
            .split('&')
            .filter(|segment| !segment.is_empty() && !self.is_constraint_segment(segment))
            .collect::<Vec<_>>()
            .join("&");
        let mut serializer = form_urlencoded::Serializer::new(kept);
        for (key, value) in self.params(constraint) {
            serializer.append_pair(key, &value.to_string());
        }

        let mut url = format!("{base}?{}", serializer.finish());
        if !fragment.is_empty() {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}
