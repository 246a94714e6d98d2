//! Deferred Tasks - Work pushed to the next scheduling turn.
//!
//! A turn is one pass of the host loop. `defer` queues a task and
//! `run_pending` runs everything queued before the call; tasks queued while
//! it runs land in the next turn. Nothing here cancels or reorders a task
//! because of state changes in between.
//!
//! # Example
//!
//! ```ignore
//! use counter_app::state::schedule::{defer, run_pending};
//!
//! defer(|| println!("later"));
//! run_pending(); // prints "later"
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;

type Task = Box<dyn FnOnce()>;

thread_local! {
    static QUEUE: RefCell<VecDeque<Task>> = RefCell::new(VecDeque::new());
}

/// Queue a task for the next turn.
pub fn defer<F>(task: F)
where
    F: FnOnce() + 'static,
{
    QUEUE.with(|q| q.borrow_mut().push_back(Box::new(task)));
}

/// Run the tasks queued so far. Returns how many ran.
pub fn run_pending() -> usize {
    // Take the batch first so tasks may defer more work without a borrow
    let batch: VecDeque<Task> = QUEUE.with(|q| std::mem::take(&mut *q.borrow_mut()));
    let ran = batch.len();
    for task in batch {
        task();
    }
    ran
}

/// Number of tasks waiting for the next turn.
pub fn pending_count() -> usize {
    QUEUE.with(|q| q.borrow().len())
}

/// Drop all queued tasks (for testing).
pub fn reset_scheduler() {
    QUEUE.with(|q| q.borrow_mut().clear());
}

// =============================================================================
// TESTS
// =============================================================================
