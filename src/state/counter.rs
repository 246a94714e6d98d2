//! Counter State - The bounded integer behind the counter widget.
//!
//! Holds `count`, `min` and `max` as signals so deriveds that read them
//! re-run on every change.
//!
//! # Rules
//!
//! - `increment` / `decrement` move by exactly one and never cross a bound.
//!   At a bound they are silent no-ops.
//! - Bounds must satisfy `min <= max`; setters reject anything else.
//! - Changing a bound never clamps the current count. A count left outside
//!   the new range stays there until a mutation moves it.
//!
//! # Example
//!
//! ```ignore
//! use counter_app::state::counter::CounterState;
//!
//! let state = CounterState::new();
//! state.increment();
//! assert_eq!(state.count(), 1);
//! ```

use spark_signals::{signal, Signal};

use crate::error::{CounterError, Result};

/// Initial count at construction.
pub const DEFAULT_COUNT: i32 = 0;
/// Initial inclusive lower bound.
pub const DEFAULT_MIN: i32 = -5;
/// Initial inclusive upper bound.
pub const DEFAULT_MAX: i32 = 25;

// =============================================================================
// CounterState
// =============================================================================

/// Reactive counter state.
///
/// Cloning yields another handle onto the same signals.
#[derive(Clone)]
pub struct CounterState {
    count: Signal<i32>,
    min: Signal<i32>,
    max: Signal<i32>,
}

impl CounterState {
    /// Create state with the default count and bounds (0 in -5..=25).
    pub fn new() -> Self {
        Self {
            count: signal(DEFAULT_COUNT),
            min: signal(DEFAULT_MIN),
            max: signal(DEFAULT_MAX),
        }
    }

    /// Create state with explicit values.
    ///
    /// Fails with `InvalidBounds` if `min > max`. The count itself is not
    /// checked against the bounds.
    pub fn with_values(count: i32, min: i32, max: i32) -> Result<Self> {
        check_bounds(min, max)?;
        Ok(Self {
            count: signal(count),
            min: signal(min),
            max: signal(max),
        })
    }

    // =========================================================================
    // Reads (tracked when called inside a derived or effect)
    // =========================================================================

    pub fn count(&self) -> i32 {
        self.count.get()
    }

    pub fn min(&self) -> i32 {
        self.min.get()
    }

    pub fn max(&self) -> i32 {
        self.max.get()
    }

    /// Signal handle for the count, for effects that observe changes.
    pub fn count_signal(&self) -> Signal<i32> {
        self.count.clone()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one if below `max`. Returns whether the count moved.
    pub fn increment(&self) -> bool {
        let count = self.count.get();
        if count < self.max.get() {
            self.count.set(count + 1);
            tracing::trace!(count = count + 1, "counter incremented");
            true
        } else {
            false
        }
    }

    /// Subtract one if above `min`. Returns whether the count moved.
    pub fn decrement(&self) -> bool {
        let count = self.count.get();
        if count > self.min.get() {
            self.count.set(count - 1);
            tracing::trace!(count = count - 1, "counter decremented");
            true
        } else {
            false
        }
    }

    /// Write the count directly. Not clamped.
    pub fn set_count(&self, count: i32) {
        self.count.set(count);
    }

    /// Replace the lower bound. Rejected if it would exceed `max`.
    pub fn set_min(&self, min: i32) -> Result<()> {
        check_bounds(min, self.max.get())?;
        self.min.set(min);
        Ok(())
    }

    /// Replace the upper bound. Rejected if it would fall below `min`.
    pub fn set_max(&self, max: i32) -> Result<()> {
        check_bounds(self.min.get(), max)?;
        self.max.set(max);
        Ok(())
    }

    /// Replace both bounds at once, for moves that would briefly invert them
    /// if applied one at a time.
    pub fn set_bounds(&self, min: i32, max: i32) -> Result<()> {
        check_bounds(min, max)?;
        self.min.set(min);
        self.max.set(max);
        Ok(())
    }

    /// True when `min <= count <= max`.
    pub fn in_bounds(&self) -> bool {
        let count = self.count.get();
        self.min.get() <= count && count <= self.max.get()
    }
}

impl Default for CounterState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CounterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterState")
            .field("count", &self.count.get())
            .field("min", &self.min.get())
            .field("max", &self.max.get())
            .finish()
    }
}

/// Reject inverted bounds.
pub fn check_bounds(min: i32, max: i32) -> Result<()> {
    if min > max {
        return Err(CounterError::InvalidBounds { min, max });
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
