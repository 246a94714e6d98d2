//! Renderer - frame buffer and differential terminal output.

mod buffer;
mod diff;

pub use buffer::*;
pub use diff::*;
