//! # counter-app
//!
//! A bounded counter widget for the terminal, built on
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! The widget keeps its count and bounds in signals and emits a structural
//! template on demand. The host pipeline is purely derived-based:
//!
//! ```text
//! CounterState signals → template → taffy layout → paint → render effect
//! ```
//!
//! Reaching 21 schedules a confetti burst for the next turn of the event
//! loop.
//!
//! ## Modules
//!
//! - [`types`] - Colors, cells, rectangles
//! - [`state`] - Counter state, celebration trigger, confetti, input
//! - [`primitives`] - The counter widget and its template
//! - [`engine`] - Element capabilities and explicit registration
//! - [`theme`] - Semantic colors and presets
//! - [`i18n`] - Localized strings
//! - [`layout`] - Taffy flexbox layout
//! - [`renderer`] - Frame buffer and diff renderer
//! - [`pipeline`] - Frame derived, mount and event loop

pub mod engine;
pub mod error;
pub mod i18n;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod theme;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{CounterError, Result};

pub use engine::{create, define, defined_tags, is_defined, reset_registry, Element, Localized, Themed};

pub use i18n::{LocaleRegistration, Localization, LocalizationProvider, StaticLocales};

pub use layout::{compute_layout, string_width, truncate_text};

pub use renderer::{DiffRenderer, FrameBuffer};

pub use pipeline::{
    attach, build_frame, mount, run, set_terminal_size, terminal_height, terminal_width, tick,
    unmount, FrameResult, HitRegion, MountHandle, PaintContext,
};

pub use primitives::{
    register, Action, Cleanup, CounterApp, CounterProps, Node, RenderState, ValueClass,
    ValueTreatment, TAG,
};

pub use state::{
    CelebrationTarget, CelebrationTrigger, ConfettiContainer, CounterState, TargetSlot,
    TriggerState, CELEBRATION_VALUE,
};

pub use theme::{active_theme, get_preset, preset_names, set_custom_theme, set_theme, Theme, ThemeColor, Theming};
