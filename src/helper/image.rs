//! Responsive images (`xpc-image*`).
//!
//! ```html
//! <img xpc-image="hero" xpc-image-size-constraint="max:1200"
//!      xpc-image-srcset='[[1, 600], [2, 1200]]'>
//! ```
//!
//! Renders `src`, `srcset`/`sizes`, `width`, `height`, `alt`, `title` and
//! `loading` from an [`ImageSource`]. Resized URLs come from an
//! [`ImageUrlService`].

use serde::Deserialize;
use thiserror::Error;

use super::{TagContext, TagHelper, TagOutput, is_blank};
use crate::config::ImageConfig;
use crate::html::Attributes;
use crate::marker::{IMAGE_ERROR_ATTR, IMAGE_PATH_MISSING, Marker};
use crate::media::{ImageSource, ImageUrlService, SizeConstraint, is_passthrough};

/// A `srcset` or `sizes` entry that cannot describe a resized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CandidateError {
    #[error("candidate max size must be greater than 0")]
    ZeroMax,
    #[error("density factor must be a positive number")]
    Factor,
}

/// Pixel-density candidate: `{url} {factor}x`, resized to `max` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "(f64, u32)")]
pub struct Density {
    pub factor: f64,
    pub max: u32,
}

impl Density {
    pub fn new(factor: f64, max: u32) -> Self {
        Self { factor, max }
    }
}

impl TryFrom<(f64, u32)> for Density {
    type Error = CandidateError;

    fn try_from((factor, max): (f64, u32)) -> Result<Self, Self::Error> {
        if max == 0 {
            return Err(CandidateError::ZeroMax);
        }
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CandidateError::Factor);
        }
        Ok(Self { factor, max })
    }
}

/// Width candidate: `{url} {max}w`, chosen below the `breakpoint` viewport width.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "(u32, String)")]
pub struct WidthBreakpoint {
    pub max: u32,
    pub breakpoint: String,
}

impl WidthBreakpoint {
    pub fn new(max: u32, breakpoint: impl Into<String>) -> Self {
        Self {
            max,
            breakpoint: breakpoint.into(),
        }
    }
}

impl TryFrom<(u32, String)> for WidthBreakpoint {
    type Error = CandidateError;

    fn try_from((max, breakpoint): (u32, String)) -> Result<Self, Self::Error> {
        if max == 0 {
            return Err(CandidateError::ZeroMax);
        }
        Ok(Self { max, breakpoint })
    }
}

/// Fills in an `<img>` from an image source.
pub struct ImageTagHelper<'a> {
    service: &'a dyn ImageUrlService,
    config: &'a ImageConfig,
    image: Option<&'a dyn ImageSource>,
    constraint: SizeConstraint,
    srcset: Vec<Density>,
    sizes: Vec<WidthBreakpoint>,
    alt: Option<String>,
    title: Option<String>,
    loading: Option<String>,
}

impl<'a> ImageTagHelper<'a> {
    pub fn new(service: &'a dyn ImageUrlService, config: &'a ImageConfig) -> Self {
        Self {
            service,
            config,
            image: None,
            constraint: config.default_constraint,
            srcset: Vec::new(),
            sizes: Vec::new(),
            alt: None,
            title: None,
            loading: None,
        }
    }

    pub fn image(mut self, image: &'a dyn ImageSource) -> Self {
        self.image = Some(image);
        self
    }

    pub fn constraint(mut self, constraint: SizeConstraint) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn srcset(mut self, srcset: Vec<Density>) -> Self {
        self.srcset = srcset;
        self
    }

    pub fn sizes(mut self, sizes: Vec<WidthBreakpoint>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn loading(mut self, loading: impl Into<String>) -> Self {
        self.loading = Some(loading.into());
        self
    }

    fn render_image(&self, image: &dyn ImageSource, overrides: Overrides, attrs: &mut Attributes) {
        let path = image.relative_path();
        if is_blank(path) {
            attrs.set(IMAGE_ERROR_ATTR, IMAGE_PATH_MISSING);
            return;
        }

        if is_passthrough(path, &self.config.passthrough) {
            attrs.set("src", path);
        } else {
            attrs.set("src", self.service.constrain(path, self.constraint));
            self.set_srcset(path, attrs);
        }

        if image.width() > 0 {
            attrs.set("width", image.width().to_string());
        }
        if image.height() > 0 {
            attrs.set("height", image.height().to_string());
        }

        if !overrides.alt {
            attrs.set("alt", image.alt_text().unwrap_or_default());
        }
        if !overrides.title
            && let Some(title) = image.title().filter(|t| !is_blank(t))
        {
            attrs.set("title", title);
        }
        if !overrides.loading {
            attrs.set("loading", self.config.default_loading.as_str());
        }
    }

    /// Density candidates win over width candidates.
    fn set_srcset(&self, path: &str, attrs: &mut Attributes) {
        let resized = |max| self.service.constrain(path, SizeConstraint::MaxWidthOrHeight(max));

        if !self.srcset.is_empty() {
            let srcset: Vec<String> = self
                .srcset
                .iter()
                .map(|d| format!("{} {}x", resized(d.max), d.factor))
                .collect();
            attrs.set("srcset", srcset.join(","));
        } else if !self.sizes.is_empty() {
            let srcset: Vec<String> = self
                .sizes
                .iter()
                .map(|w| format!("{} {}w", resized(w.max), w.max))
                .collect();
            let sizes: Vec<String> = self
                .sizes
                .iter()
                .map(|w| format!("(max-width: {}) {}px", w.breakpoint, w.max))
                .collect();
            attrs.set("srcset", srcset.join(","));
            attrs.set("sizes", sizes.join(","));
        }
    }
}

/// Which of `alt`/`title`/`loading` were given explicitly.
#[derive(Debug, Clone, Copy, Default)]
struct Overrides {
    alt: bool,
    title: bool,
    loading: bool,
}

/// Copy a non-blank explicit value onto the output.
fn copy_override(attrs: &mut Attributes, name: &str, value: Option<&str>) -> bool {
    match value.filter(|v| !is_blank(v)) {
        Some(value) => {
            attrs.set(name, value);
            true
        }
        None => false,
    }
}

impl TagHelper for ImageTagHelper<'_> {
    fn order(&self) -> i32 {
        10
    }

    fn process(&self, _context: &TagContext<'_>, output: &mut TagOutput<'_>) {
        let attrs = &mut output.attributes;
        let overrides = Overrides {
            alt: copy_override(attrs, "alt", self.alt.as_deref()),
            title: copy_override(attrs, "title", self.title.as_deref()),
            loading: copy_override(attrs, "loading", self.loading.as_deref()),
        };

        match self.image {
            Some(image) => self.render_image(image, overrides, attrs),
            None => output.suppress_output(),
        }

        for marker in Marker::IMAGE {
            output.attributes.remove(marker.name());
        }
    }
}
