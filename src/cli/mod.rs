//! Command-line interface module.

mod args;
pub mod markers;
pub mod render;

pub use args::{Cli, Commands, RenderArgs};
