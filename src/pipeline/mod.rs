//! Reference host: parse markup, bind markers, run helpers, serialize.
//!
//! # Phases
//!
//! ```text
//! &str ──parse──▶ Vec<Node> ──bind──▶ Vec<BoundNode> ──render──▶ String
//!       │                      │                         │
//!  nesting limit         decode payloads            helpers by order,
//!                      (may fail in strict)       lazy child content
//! ```

mod bind;
mod bindings;
mod error;
mod render;

pub use bindings::Bindings;
pub use error::{MarkerError, RenderError};

use crate::config::{ImageConfig, XpcConfig};
use crate::html;
use crate::media::{ImageUrlService, QueryImageService};
use bind::Binder;
use render::Env;

/// Renders templates containing `xpc-*` markers.
pub struct Renderer {
    strict: bool,
    image_config: ImageConfig,
    bindings: Bindings,
    service: Box<dyn ImageUrlService>,
}

impl Renderer {
    /// Renderer using the query-string image service built from `config`.
    pub fn new(config: &XpcConfig) -> Self {
        Self {
            strict: config.render.strict,
            image_config: config.image.clone(),
            bindings: Bindings::new(),
            service: Box::new(QueryImageService::from_config(&config.image)),
        }
    }

    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_service(mut self, service: impl ImageUrlService + 'static) -> Self {
        self.service = Box::new(service);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Render one document or fragment.
    pub async fn render(&self, source: &str) -> Result<String, RenderError> {
        let binder = Binder {
            bindings: &self.bindings,
            strict: self.strict,
        };
        let nodes = binder.bind(html::parse(source)?)?;

        let env = Env {
            service: self.service.as_ref(),
            image_config: &self.image_config,
        };
        Ok(render::render_nodes(env, &nodes).await)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&XpcConfig::default())
    }
}
