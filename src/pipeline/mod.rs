//! Reactive Pipeline
//!
//! Connects a mounted element to the terminal.
//!
//! ```text
//! element signals → frame derived (template → layout → paint) → render effect
//! ```
//!
//! - **frame derived** - pure: reads the element, theme, focus, hover,
//!   confetti and terminal size; returns a buffer plus hit regions
//! - **render effect** - the only side effects: hit grid and terminal I/O

pub mod frame;
pub mod mount;
pub mod terminal;

pub use frame::{build_frame, paint, FrameResult, HitRegion, PaintContext};
pub use mount::{attach, mount, run, tick, unmount, MountHandle, SharedOutput};
pub use terminal::{set_terminal_size, terminal_height, terminal_size, terminal_width};
