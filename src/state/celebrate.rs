//! Celebration Trigger - Fires the confetti when the count becomes 21.
//!
//! A two-state machine driven by count *changes*:
//!
//! ```text
//! Idle ──count becomes 21──▶ Triggered ──count leaves 21──▶ Idle
//! ```
//!
//! Entering `Triggered` schedules one pop on the deferred queue. When the pop
//! runs it toggles the target's `popped` flag off and back on, restarting the
//! effect. Leaving 21 fires nothing; it only re-arms the trigger.
//!
//! The trigger watches through an effect and compares against the last value
//! it saw, so re-runs without a change never fire. A missing target is fine:
//! the pop just finds nothing to toggle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{effect, Signal};

use super::schedule;

/// The count that sets off the celebration.
pub const CELEBRATION_VALUE: i32 = 21;

/// Trigger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    #[default]
    Idle,
    Triggered,
}

// =============================================================================
// Target
// =============================================================================

/// Something that shows a restartable celebration.
///
/// The trigger only toggles `popped`; the target owns the animation.
pub trait CelebrationTarget {
    fn set_popped(&self, popped: bool);
    fn is_popped(&self) -> bool;
}

/// Shared, optional reference to the celebration target.
///
/// Empty until the host connects one.
#[derive(Clone, Default)]
pub struct TargetSlot {
    inner: Rc<RefCell<Option<Rc<dyn CelebrationTarget>>>>,
}

impl TargetSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, target: Rc<dyn CelebrationTarget>) {
        *self.inner.borrow_mut() = Some(target);
    }

    pub fn detach(&self) {
        self.inner.borrow_mut().take();
    }

    pub fn get(&self) -> Option<Rc<dyn CelebrationTarget>> {
        self.inner.borrow().clone()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().is_some()
    }
}

/// Restart the effect on whatever target is attached right now.
fn pop(target: &TargetSlot) {
    match target.get() {
        Some(target) => {
            target.set_popped(false);
            target.set_popped(true);
        }
        None => tracing::trace!("celebration target not attached, skipping pop"),
    }
}

// =============================================================================
// Trigger
// =============================================================================

struct Shared {
    state: Cell<TriggerState>,
    fired: Cell<u32>,
    last_seen: Cell<Option<i32>>,
    active: Cell<bool>,
    target: TargetSlot,
}

impl Shared {
    fn observe(&self, current: i32) {
        if self.last_seen.replace(Some(current)) == Some(current) {
            return;
        }

        if current == CELEBRATION_VALUE {
            self.state.set(TriggerState::Triggered);
            self.fired.set(self.fired.get() + 1);
            tracing::info!(count = current, fired = self.fired.get(), "celebration triggered");

            let target = self.target.clone();
            schedule::defer(move || pop(&target));
        } else {
            self.state.set(TriggerState::Idle);
        }
    }
}

/// Watches a count signal and schedules pops on entry to 21.
pub struct CelebrationTrigger {
    shared: Rc<Shared>,
    stop_effect: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl CelebrationTrigger {
    /// Start watching `count`. The initial value counts as the first change,
    /// so a counter created at 21 celebrates once.
    pub fn watch(count: Signal<i32>, target: TargetSlot) -> Self {
        let shared = Rc::new(Shared {
            state: Cell::new(TriggerState::Idle),
            fired: Cell::new(0),
            last_seen: Cell::new(None),
            active: Cell::new(true),
            target,
        });

        shared.observe(count.get());

        let watcher = shared.clone();
        let stop_fn = effect(move || {
            // Read first so the dependency is tracked even while stopped
            let current = count.get();
            if watcher.active.get() {
                watcher.observe(current);
            }
        });

        Self {
            shared,
            stop_effect: RefCell::new(Some(Box::new(stop_fn))),
        }
    }

    pub fn state(&self) -> TriggerState {
        self.shared.state.get()
    }

    /// How many transitions into 21 have been seen.
    pub fn fired_count(&self) -> u32 {
        self.shared.fired.get()
    }

    pub fn target(&self) -> &TargetSlot {
        &self.shared.target
    }

    /// Stop reacting to further changes.
    pub fn stop(&self) {
        self.shared.active.set(false);
        if let Some(stop) = self.stop_effect.borrow_mut().take() {
            stop();
        }
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.get()
    }
}

impl Drop for CelebrationTrigger {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// TESTS
// =============================================================================
