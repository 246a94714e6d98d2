//! Mount API - Application lifecycle and render effect.
//!
//! Mounting an element sets up:
//!
//! 1. The confetti container, connected as the element's celebration target
//! 2. One frame derived (template -> layout -> paint)
//! 3. One render effect (hit grid + diff renderer)
//! 4. Key and mouse handlers
//!
//! # Example
//!
//! ```ignore
//! use counter_app::pipeline::mount;
//!
//! let handle = mount::mount(app)?;
//!
//! // Option 1: Run blocking event loop
//! mount::run(&handle)?;
//!
//! // Option 2: Tick manually in your own loop
//! while mount::tick(&handle)? {
//!     // Your logic here
//! }
//!
//! handle.unmount();
//! ```

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use spark_signals::{derived, effect, flush_sync, signal, Signal};

use crate::engine::Element;
use crate::error::Result;
use crate::primitives::template::Action;
use crate::primitives::Cleanup;
use crate::renderer::DiffRenderer;
use crate::state::{input, keyboard, mouse, schedule, ConfettiContainer};

use super::frame::{action_for_target, build_frame, PaintContext};
use super::terminal::{
    detect_terminal_size, enter_fullscreen, exit_fullscreen, terminal_height_signal,
    terminal_width_signal,
};

/// Event poll timeout per tick (~60fps).
pub const TICK: Duration = Duration::from_millis(16);

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`] / [`attach`].
///
/// Dropping it detaches handlers, stops the render effect and, when the
/// terminal was taken over, restores it.
pub struct MountHandle {
    element: Rc<dyn Element>,
    confetti: ConfettiContainer,
    focus: Signal<Option<Action>>,
    running: Arc<AtomicBool>,
    stop_effect: Option<Box<dyn FnOnce()>>,
    cleanups: Vec<Cleanup>,
    fullscreen: bool,
}

impl MountHandle {
    /// Stop and clean up.
    pub fn unmount(mut self) {
        self.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the loop to stop. Safe to call from any handler.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn element(&self) -> &Rc<dyn Element> {
        &self.element
    }

    pub fn confetti(&self) -> &ConfettiContainer {
        &self.confetti
    }

    /// Button with keyboard focus.
    pub fn focused(&self) -> Option<Action> {
        self.focus.get()
    }

    /// One scheduling turn without polling input: advance the confetti, run
    /// deferred tasks, flush effects. A burst popped this turn paints frame 0.
    pub fn step(&self) {
        self.confetti.advance();
        let ran = schedule::run_pending();
        if ran > 0 {
            tracing::trace!(tasks = ran, "deferred tasks ran");
        }
        flush_sync();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        let Some(stop) = self.stop_effect.take() else {
            return;
        };

        for cleanup in self.cleanups.drain(..) {
            cleanup();
        }
        stop();
        self.element.disconnect();

        if self.fullscreen {
            self.fullscreen = false;
            if let Err(err) = input::disable_mouse() {
                tracing::warn!(error = %err, "failed to disable mouse capture");
            }
            if let Err(err) = exit_fullscreen(&mut io::stdout()) {
                tracing::warn!(error = %err, "failed to restore terminal");
            }
        }
        tracing::debug!(tag = self.element.tag(), "unmounted");
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Mount Functions
// =============================================================================

/// Take over the terminal and mount `element` in it.
pub fn mount(element: Rc<dyn Element>) -> Result<MountHandle> {
    detect_terminal_size();

    let mut stdout = io::stdout();
    enter_fullscreen(&mut stdout)?;
    if let Err(err) = input::enable_mouse() {
        // Leave the terminal usable before reporting
        let _ = exit_fullscreen(&mut stdout);
        return Err(err.into());
    }

    let mut handle = attach(element, stdout);
    handle.fullscreen = true;
    Ok(handle)
}

/// Build the pipeline for `element`, rendering to `out`.
///
/// Does not touch terminal modes; [`mount`] does that around it.
pub fn attach<W: Write + 'static>(element: Rc<dyn Element>, out: W) -> MountHandle {
    let confetti = ConfettiContainer::new();
    element.connect(Rc::new(confetti.clone()));

    let focus: Signal<Option<Action>> = signal(None);
    let running = Arc::new(AtomicBool::new(true));

    // Frame derived: everything visual flows through here
    let frame = {
        let element = element.clone();
        let confetti = confetti.clone();
        let focus = focus.clone();
        let tw = terminal_width_signal();
        let th = terminal_height_signal();
        derived(move || {
            let ctx = PaintContext {
                theme: element.theme(),
                hovered: mouse::hovered_target().and_then(action_for_target),
                focused: focus.get(),
                confetti_frame: confetti.active_frame(),
            };
            build_frame(&element.template(), tw.get(), th.get(), &ctx)
        })
    };

    mouse::resize_hit_grid(terminal_width_signal().get(), terminal_height_signal().get());
    let mut last_hit_grid_size = mouse::hit_grid_size();

    // The ONE render effect
    let mut renderer = DiffRenderer::new(out);
    let running_effect = running.clone();
    let stop_fn = effect(move || {
        if !running_effect.load(Ordering::SeqCst) {
            return;
        }

        let result = frame.get();

        let (tw, th) = result.terminal_size;
        if last_hit_grid_size != (tw, th) {
            mouse::resize_hit_grid(tw, th);
            last_hit_grid_size = (tw, th);
        } else {
            mouse::clear_hit_grid();
        }
        for region in &result.hit_regions {
            mouse::fill_hit_rect(
                region.rect.x,
                region.rect.y,
                region.rect.width,
                region.rect.height,
                region.target,
            );
        }

        if let Err(err) = renderer.render(&result.buffer) {
            tracing::warn!(error = %err, "render failed");
        }
    });

    let cleanups = wire_handlers(&element, &focus, &running);
    tracing::debug!(tag = element.tag(), "mounted");

    MountHandle {
        element,
        confetti,
        focus,
        running,
        stop_effect: Some(Box::new(stop_fn)),
        cleanups,
        fullscreen: false,
    }
}

/// Unmount and clean up.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

// =============================================================================
// Input wiring
// =============================================================================

/// Buttons focus can land on, in tab order.
fn focusable(element: &Rc<dyn Element>) -> Vec<Action> {
    element
        .template()
        .buttons()
        .into_iter()
        .filter(|(_, disabled)| !disabled)
        .map(|(action, _)| action)
        .collect()
}

/// Move focus forward or back, wrapping.
fn cycle_focus(element: &Rc<dyn Element>, focus: &Signal<Option<Action>>, forward: bool) {
    let order = focusable(element);
    if order.is_empty() {
        focus.set(None);
        return;
    }

    let current = focus.get().and_then(|a| order.iter().position(|o| *o == a));
    let next = match (current, forward) {
        (None, true) => 0,
        (None, false) => order.len() - 1,
        (Some(i), true) => (i + 1) % order.len(),
        (Some(i), false) => (i + order.len() - 1) % order.len(),
    };
    focus.set(Some(order[next]));
}

fn wire_handlers(
    element: &Rc<dyn Element>,
    focus: &Signal<Option<Action>>,
    running: &Arc<AtomicBool>,
) -> Vec<Cleanup> {
    let mut cleanups: Vec<Cleanup> = Vec::new();

    let el = element.clone();
    cleanups.push(Box::new(keyboard::on_keys(&["+", "=", "ArrowUp", "ArrowRight"], move || {
        el.activate(Action::Increment);
        true
    })));

    let el = element.clone();
    cleanups.push(Box::new(keyboard::on_keys(&["-", "_", "ArrowDown", "ArrowLeft"], move || {
        el.activate(Action::Decrement);
        true
    })));

    let (el, f) = (element.clone(), focus.clone());
    cleanups.push(Box::new(keyboard::on_keys(&["Enter", "Space"], move || {
        match f.get() {
            Some(action) => {
                el.activate(action);
                true
            }
            None => false,
        }
    })));

    let (el, f) = (element.clone(), focus.clone());
    cleanups.push(Box::new(keyboard::on_key("BackTab", move || {
        cycle_focus(&el, &f, false);
        true
    })));

    // Tab, with or without shift
    let (el, f) = (element.clone(), focus.clone());
    cleanups.push(Box::new(keyboard::on(move |event| {
        if event.key != "Tab" {
            return false;
        }
        cycle_focus(&el, &f, !event.modifiers.shift);
        true
    })));

    let r = running.clone();
    cleanups.push(Box::new(keyboard::on_keys(&["q", "Escape"], move || {
        r.store(false, Ordering::SeqCst);
        true
    })));

    let r = running.clone();
    cleanups.push(Box::new(keyboard::on(move |event| {
        if event.modifiers.ctrl && event.key == "c" {
            r.store(false, Ordering::SeqCst);
            return true;
        }
        false
    })));

    let el = element.clone();
    cleanups.push(Box::new(mouse::on_click(move |event| {
        match event.target.and_then(action_for_target) {
            Some(action) => {
                el.activate(action);
                true
            }
            None => false,
        }
    })));

    cleanups
}

// =============================================================================
// Event Loop
// =============================================================================

/// Run the event loop once.
///
/// Polls one event, routes it, then runs a scheduling turn.
/// Returns `Ok(false)` once the app should stop.
pub fn tick(handle: &MountHandle) -> Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    if let Some(event) = input::poll_event(TICK)? {
        input::route_event(event);
    }
    handle.step();

    Ok(handle.is_running())
}

/// Run the event loop (blocking until stopped).
pub fn run(handle: &MountHandle) -> Result<()> {
    while tick(handle)? {}
    Ok(())
}

/// `Write` into a shared byte buffer. Lets callers inspect output after
/// handing the writer to [`attach`].
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::terminal::set_terminal_size;
    use crate::primitives::{CounterApp, CounterProps};
    use crate::state::keyboard::{KeyboardEvent, Modifiers};
    use crate::state::mouse::{MouseButton, MouseEvent};

    fn reset() {
        keyboard::reset_keyboard_state();
        mouse::reset_mouse_state();
        schedule::reset_scheduler();
        crate::theme::reset_theme_state();
        set_terminal_size(60, 20);
    }

    fn setup(count: i32) -> (Rc<CounterApp>, MountHandle, SharedOutput) {
        reset();
        let app = Rc::new(CounterApp::from_props(CounterProps { count, ..Default::default() }).unwrap());
        let out = SharedOutput::new();
        let handle = attach(app.clone(), out.clone());
        flush_sync();
        (app, handle, out)
    }

    fn press(key: &str) {
        keyboard::dispatch(KeyboardEvent::new(key));
        flush_sync();
    }

    #[test]
    fn test_attach_renders_and_connects() {
        let (app, _handle, out) = setup(0);
        assert!(app.is_connected());
        assert!(out.contents().contains("[ + ]"));
    }

    #[test]
    fn test_keys_change_count() {
        let (app, _handle, _out) = setup(0);
        press("+");
        press("ArrowUp");
        press("=");
        assert_eq!(app.count(), 3);
        press("-");
        press("ArrowLeft");
        assert_eq!(app.count(), 1);
    }

    #[test]
    fn test_tab_focus_and_enter() {
        let (app, handle, _out) = setup(0);
        assert_eq!(handle.focused(), None);

        press("Tab");
        assert_eq!(handle.focused(), Some(Action::Decrement));
        press("Tab");
        assert_eq!(handle.focused(), Some(Action::Increment));
        press("Enter");
        assert_eq!(app.count(), 1);

        press("BackTab");
        assert_eq!(handle.focused(), Some(Action::Decrement));
        press("Space");
        assert_eq!(app.count(), 0);
    }

    #[test]
    fn test_focus_skips_disabled_button() {
        let (_app, handle, _out) = setup(25);
        press("Tab");
        assert_eq!(handle.focused(), Some(Action::Decrement));
        press("Tab");
        assert_eq!(handle.focused(), Some(Action::Decrement));
    }

    #[test]
    fn test_click_activates_button() {
        let (app, _handle, _out) = setup(0);
        let plus = (0..60u16)
            .flat_map(|x| (0..20u16).map(move |y| (x, y)))
            .find(|&(x, y)| mouse::hit_test(x, y).and_then(action_for_target) == Some(Action::Increment))
            .expect("increment button has a hit region");

        mouse::dispatch(MouseEvent::down(MouseButton::Left, plus.0, plus.1));
        mouse::dispatch(MouseEvent::up(MouseButton::Left, plus.0, plus.1));
        flush_sync();
        assert_eq!(app.count(), 1);
    }

    #[test]
    fn test_celebration_plays_through_steps() {
        let (app, handle, _out) = setup(20);
        press("+");
        assert_eq!(app.count(), 21);
        assert!(!handle.confetti().is_active());

        handle.step();
        assert!(handle.confetti().is_active());
        assert_eq!(handle.confetti().bursts(), 1);
        assert_eq!(handle.confetti().active_frame(), Some(0));

        handle.step();
        assert_eq!(handle.confetti().active_frame(), Some(1));
    }

    #[test]
    fn test_quit_keys_stop() {
        let (_app, handle, _out) = setup(0);
        assert!(handle.is_running());
        press("q");
        assert!(!handle.is_running());
        drop(handle);

        let (_app, handle, _out) = setup(0);
        keyboard::dispatch(KeyboardEvent::with_modifiers("c", Modifiers::ctrl()));
        assert!(!handle.is_running());
    }

    #[test]
    fn test_unmount_detaches() {
        let (app, handle, _out) = setup(0);
        handle.unmount();
        assert!(!app.is_connected());
        press("+");
        assert_eq!(app.count(), 0);
    }
}
