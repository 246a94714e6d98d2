//! State Module - Runtime state behind the counter
//!
//! - **Counter** - The bounded count and its bounds
//! - **Celebrate** - Trigger that fires on entry to 21
//! - **Confetti** - The restartable celebration effect
//! - **Schedule** - Deferred tasks for the next turn
//! - **Keyboard** / **Mouse** / **Input** - Event types, dispatch, routing

pub mod celebrate;
pub mod confetti;
pub mod counter;
pub mod input;
pub mod keyboard;
pub mod mouse;
pub mod schedule;

pub use celebrate::{CelebrationTarget, CelebrationTrigger, TargetSlot, TriggerState, CELEBRATION_VALUE};
pub use confetti::{ConfettiContainer, Particle, CONFETTI_FRAMES};
pub use counter::{CounterState, DEFAULT_COUNT, DEFAULT_MAX, DEFAULT_MIN};
pub use keyboard::{KeyState, KeyboardEvent, Modifiers};
pub use mouse::{MouseAction, MouseButton, MouseEvent};
pub use schedule::{defer, run_pending};
