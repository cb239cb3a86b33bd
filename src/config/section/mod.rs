//! Configuration sections.
//!
//! - `image`: `[image]` helper defaults and image URL parameters
//! - `render`: `[render]` payload strictness

mod image;
mod render;

pub use image::ImageConfig;
pub use render::RenderConfig;
