//! Layout Module
//!
//! Flexbox layout of a template tree using
//! [Taffy](https://github.com/DioxusLabs/taffy).
//!
//! # Example
//!
//! ```ignore
//! use counter_app::layout::compute_layout;
//! use spark_signals::derived;
//!
//! let rects = derived(move || compute_layout(&app.template(), 80, 24));
//! ```

mod taffy_bridge;
mod text_measure;

pub use taffy_bridge::*;
pub use text_measure::*;
