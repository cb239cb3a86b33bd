//! Image descriptors, size constraints and resized-URL services.
//!
//! - `constraint`: `SizeConstraint` and its `max:400` string form
//! - `service`: `ImageUrlService` trait and the query-string implementation

mod constraint;
mod service;

pub use constraint::{ParseConstraintError, SizeConstraint};
pub use service::{ImageUrlService, QueryImageService};

use serde::{Deserialize, Serialize};

/// Read-only view of an image the renderer can display.
///
/// Any data source (CMS asset, media library item, plain struct) can back
/// an `<img>` by implementing this.
pub trait ImageSource {
    fn relative_path(&self) -> &str;
    fn alt_text(&self) -> Option<&str>;
    fn title(&self) -> Option<&str>;
    /// Intrinsic width in pixels; zero or negative when unknown.
    fn width(&self) -> i32;
    /// Intrinsic height in pixels; zero or negative when unknown.
    fn height(&self) -> i32;
}

impl<T: ImageSource + ?Sized> ImageSource for &T {
    fn relative_path(&self) -> &str {
        (**self).relative_path()
    }
    fn alt_text(&self) -> Option<&str> {
        (**self).alt_text()
    }
    fn title(&self) -> Option<&str> {
        (**self).title()
    }
    fn width(&self) -> i32 {
        (**self).width()
    }
    fn height(&self) -> i32 {
        (**self).height()
    }
}

/// Plain image descriptor, as found in data files and inline markers.
///
/// ```json
/// { "relativePath": "/media/hero.jpg", "altText": "Hero", "width": 1600, "height": 900 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageDescriptor {
    pub relative_path: String,
    pub alt_text: Option<String>,
    pub title: Option<String>,
    pub width: i32,
    pub height: i32,
}

impl ImageDescriptor {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            ..Self::default()
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = Some(alt.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl ImageSource for ImageDescriptor {
    fn relative_path(&self) -> &str {
        &self.relative_path
    }
    fn alt_text(&self) -> Option<&str> {
        self.alt_text.as_deref()
    }
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    fn width(&self) -> i32 {
        self.width
    }
    fn height(&self) -> i32 {
        self.height
    }
}

/// Split `path?query#fragment` into its three parts.
pub(crate) fn split_path(path: &str) -> (&str, &str, &str) {
    let (rest, fragment) = path.split_once('#').unwrap_or((path, ""));
    let (base, query) = rest.split_once('?').unwrap_or((rest, ""));
    (base, query, fragment)
}

/// Lowercased file extension of `path`.
///
/// Falls back to an `ext=.svg` style query parameter for extension-less
/// media handler URLs.
pub fn extension(path: &str) -> Option<String> {
    let (base, query, _) = split_path(path);

    let file = base.rsplit('/').next().unwrap_or(base);
    if let Some((stem, ext)) = file.rsplit_once('.')
        && !stem.is_empty()
        && !ext.is_empty()
    {
        return Some(ext.to_ascii_lowercase());
    }

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "ext")
        .map(|(_, value)| value.trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Whether `path` has one of the `passthrough` extensions (served unresized).
pub fn is_passthrough(path: &str, passthrough: &[String]) -> bool {
    extension(path).is_some_and(|ext| passthrough.iter().any(|p| p.eq_ignore_ascii_case(&ext)))
}
