//! Primitives - the counter widget and the pieces it emits.
//!
//! - [`counter_app`] - the widget itself
//! - [`template`] - the structural description it renders to
//! - [`types`] - props and cleanup

pub mod counter_app;
pub mod template;
mod types;

pub use counter_app::{register, CounterApp, RenderState, TAG};
pub use template::{Action, Node, ValueClass, ValueTreatment};
pub use types::*;
