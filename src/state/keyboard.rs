//! Keyboard Module - Key events and handler registry
//!
//! Does not own stdin; `input` converts terminal events and calls
//! [`dispatch`]. Key-specific handlers run before catch-all handlers, and
//! the first handler returning true consumes the event.
//!
//! # Example
//!
//! ```ignore
//! use counter_app::state::keyboard;
//!
//! let cleanup = keyboard::on_keys(&["+", "ArrowUp"], move || {
//!     app.increment();
//!     true
//! });
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use spark_signals::{signal, Signal};

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key (e.g. "a", "+", "Enter", "ArrowUp")
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    /// A plain key press
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Repeats count as presses: holding "+" keeps counting.
    pub fn is_press(&self) -> bool {
        matches!(self.state, KeyState::Press | KeyState::Repeat)
    }
}

/// Handler for any key. Return true to consume the event.
pub type KeyHandler = Box<dyn Fn(&KeyboardEvent) -> bool>;

/// Handler bound to specific keys. Return true to consume the event.
pub type KeySpecificHandler = Box<dyn Fn() -> bool>;

// =============================================================================
// STATE
// =============================================================================

thread_local! {
    static LAST_EVENT: Signal<Option<KeyboardEvent>> = signal(None);
}

/// Get the last keyboard event
pub fn last_event() -> Option<KeyboardEvent> {
    LAST_EVENT.with(|s| s.get())
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

#[derive(Default)]
struct HandlerRegistry {
    global_handlers: Vec<(usize, KeyHandler)>,
    key_handlers: HashMap<String, Vec<(usize, KeySpecificHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn remove_key_handler(&mut self, key: &str, id: usize) {
        if let Some(handlers) = self.key_handlers.get_mut(key) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
            if handlers.is_empty() {
                self.key_handlers.remove(key);
            }
        }
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::default());
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Dispatch a keyboard event. Returns true if a handler consumed it.
///
/// Releases only update `last_event`.
pub fn dispatch(event: KeyboardEvent) -> bool {
    LAST_EVENT.with(|s| s.set(Some(event.clone())));

    if !event.is_press() {
        return false;
    }

    REGISTRY.with(|reg| {
        let reg = reg.borrow();

        // Ctrl-chords never reach plain key handlers ("c" vs Ctrl+C)
        if !event.modifiers.ctrl {
            if let Some(handlers) = reg.key_handlers.get(&event.key) {
                for (_, handler) in handlers {
                    if handler() {
                        return true;
                    }
                }
            }
        }

        for (_, handler) in &reg.global_handlers {
            if handler(&event) {
                return true;
            }
        }

        false
    })
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to all keyboard events. Returns cleanup function.
pub fn on<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global_handlers.push((id, Box::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut()
                .global_handlers
                .retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to one key. Returns cleanup function.
pub fn on_key<F>(key: &str, handler: F) -> impl FnOnce() + use<F>
where
    F: Fn() -> bool + 'static,
{
    let key = key.to_string();
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.key_handlers
            .entry(key.clone())
            .or_default()
            .push((id, Box::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| reg.borrow_mut().remove_key_handler(&key, id));
    }
}

/// Subscribe to several keys with the same handler. Returns cleanup function.
pub fn on_keys<F>(keys: &[&str], handler: F) -> impl FnOnce() + use<F>
where
    F: Fn() -> bool + Clone + 'static,
{
    let ids: Vec<(String, usize)> = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        keys.iter()
            .map(|key| {
                let id = reg.next_id();
                reg.key_handlers
                    .entry(key.to_string())
                    .or_default()
                    .push((id, Box::new(handler.clone())));
                (key.to_string(), id)
            })
            .collect()
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            for (key, id) in &ids {
                reg.remove_key_handler(key, *id);
            }
        });
    }
}

/// Reset keyboard state (for testing)
pub fn reset_keyboard_state() {
    REGISTRY.with(|reg| *reg.borrow_mut() = HandlerRegistry::default());
    LAST_EVENT.with(|s| s.set(None));
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_on_key_consumes() {
        reset_keyboard_state();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _cleanup = on_key("+", move || {
            h.set(h.get() + 1);
            true
        });

        assert!(dispatch(KeyboardEvent::new("+")));
        assert!(!dispatch(KeyboardEvent::new("-")));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_cleanup_removes_handler() {
        reset_keyboard_state();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let cleanup = on_keys(&["+", "="], move || {
            h.set(h.get() + 1);
            true
        });

        dispatch(KeyboardEvent::new("="));
        cleanup();
        dispatch(KeyboardEvent::new("="));
        dispatch(KeyboardEvent::new("+"));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_release_not_dispatched() {
        reset_keyboard_state();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _cleanup = on(move |_| {
            h.set(h.get() + 1);
            true
        });

        let mut event = KeyboardEvent::new("a");
        event.state = KeyState::Release;
        assert!(!dispatch(event.clone()));
        assert_eq!(hits.get(), 0);
        assert_eq!(last_event(), Some(event));

        let mut repeat = KeyboardEvent::new("a");
        repeat.state = KeyState::Repeat;
        assert!(dispatch(repeat));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_ctrl_chord_skips_key_handlers() {
        reset_keyboard_state();
        let plain = Rc::new(Cell::new(false));
        let p = plain.clone();
        let _c1 = on_key("c", move || {
            p.set(true);
            true
        });
        let chord = Rc::new(Cell::new(false));
        let c = chord.clone();
        let _c2 = on(move |e| {
            if e.modifiers.ctrl && e.key == "c" {
                c.set(true);
                return true;
            }
            false
        });

        assert!(dispatch(KeyboardEvent::with_modifiers("c", Modifiers::ctrl())));
        assert!(!plain.get());
        assert!(chord.get());
    }
}
