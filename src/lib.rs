//! Server-side HTML helpers driven by `xpc-*` marker attributes.
//!
//! - [`helper`]: conditional attributes and classes, responsive images,
//!   rich-text unwrapping
//! - [`pipeline`]: reference host that parses markup and runs the helpers
//! - [`media`]: image sources, size constraints, resized-URL services
//!
//! ```ignore
//! let renderer = Renderer::new(&XpcConfig::default());
//! let html = renderer
//!     .render(r#"<li xpc-class-if='[true, "active"]'>Home</li>"#)
//!     .await?;
//! assert_eq!(html, r#"<li class="active">Home</li>"#);
//! ```

pub mod cli;
pub mod config;
pub mod helper;
pub mod html;
pub mod logger;
pub mod marker;
pub mod media;
pub mod pipeline;

pub use config::XpcConfig;
pub use pipeline::{Bindings, RenderError, Renderer};
