//! Named image descriptors referenced by `xpc-image="name"`.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::media::ImageDescriptor;

/// Data file contents: binding name -> image descriptor.
///
/// ```json
/// { "hero": { "relativePath": "/media/hero.jpg", "altText": "Hero", "width": 1600 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Bindings {
    images: FxHashMap<String, ImageDescriptor>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read data file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid data file {}", path.display()))
    }

    pub fn insert_image(&mut self, name: impl Into<String>, image: ImageDescriptor) {
        self.images.insert(name.into(), image);
    }

    pub fn image(&self, name: &str) -> Option<&ImageDescriptor> {
        self.images.get(name)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
