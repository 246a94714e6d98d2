//! Engine - element capabilities and registration.
//!
//! - Element: the traits a widget implements to be hosted
//! - Registry: tag to constructor, filled explicitly at setup

mod element;
mod registry;

pub use element::*;
pub use registry::*;
