//! Mouse Module - Hit testing, hover tracking and click dispatch
//!
//! The render effect paints clickable regions into a [`HitGrid`]; each cell
//! holds a target id (the index of a hit region in the current frame).
//! [`dispatch`] resolves the target under the pointer, tracks hover, and
//! fires click handlers when a left button goes down and up on the same
//! target.

use std::cell::RefCell;

use spark_signals::{signal, Signal};

use super::keyboard::Modifiers;

// =============================================================================
// TYPES
// =============================================================================

/// Mouse action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Move,
    Drag,
    Scroll,
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// Mouse event
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    pub action: MouseAction,
    pub button: MouseButton,
    /// Column (0-indexed)
    pub x: u16,
    /// Row (0-indexed)
    pub y: u16,
    pub modifiers: Modifiers,
    /// Hit target under the pointer (filled by dispatch)
    pub target: Option<usize>,
}

impl MouseEvent {
    pub fn new(action: MouseAction, button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            action,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
            target: None,
        }
    }

    pub fn down(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Down, button, x, y)
    }

    pub fn up(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Up, button, x, y)
    }

    pub fn move_to(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Move, MouseButton::None, x, y)
    }
}

// =============================================================================
// HIT GRID - O(1) coordinate to target lookup
// =============================================================================

const EMPTY: usize = usize::MAX;

/// A grid for O(1) mouse hit detection.
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<usize>,
}

impl HitGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width as usize * height as usize],
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Resize the grid, clearing all contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width as usize * height as usize, EMPTY);
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Fill a rectangle with a target id. Clipped to the grid.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, target: usize) {
        let x_end = (x as u32 + width as u32).min(self.width as u32) as u16;
        let y_end = (y as u32 + height as u32).min(self.height as u32) as u16;
        for cy in y..y_end {
            let row = cy as usize * self.width as usize;
            for cx in x..x_end {
                self.cells[row + cx as usize] = target;
            }
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match self.cells[y as usize * self.width as usize + x as usize] {
            EMPTY => None,
            target => Some(target),
        }
    }
}

// =============================================================================
// GLOBAL STATE
// =============================================================================

type ClickHandler = Box<dyn Fn(&MouseEvent) -> bool>;

thread_local! {
    static HIT_GRID: RefCell<HitGrid> = RefCell::new(HitGrid::new(80, 24));
    static HOVERED: Signal<Option<usize>> = signal(None);
    static PRESSED: RefCell<Option<usize>> = const { RefCell::new(None) };
    static CLICK_HANDLERS: RefCell<Vec<(usize, ClickHandler)>> = RefCell::new(Vec::new());
    static NEXT_ID: RefCell<usize> = const { RefCell::new(0) };
}

pub fn resize_hit_grid(width: u16, height: u16) {
    HIT_GRID.with(|g| g.borrow_mut().resize(width, height));
}

pub fn clear_hit_grid() {
    HIT_GRID.with(|g| g.borrow_mut().clear());
}

pub fn hit_grid_size() -> (u16, u16) {
    HIT_GRID.with(|g| g.borrow().size())
}

pub fn fill_hit_rect(x: u16, y: u16, width: u16, height: u16, target: usize) {
    HIT_GRID.with(|g| g.borrow_mut().fill_rect(x, y, width, height, target));
}

pub fn hit_test(x: u16, y: u16) -> Option<usize> {
    HIT_GRID.with(|g| g.borrow().get(x, y))
}

/// Target under the pointer. Tracked inside deriveds.
pub fn hovered_target() -> Option<usize> {
    HOVERED.with(|s| s.get())
}

/// Subscribe to clicks. `event.target` is always `Some` for clicks.
/// Returns cleanup function.
pub fn on_click<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&MouseEvent) -> bool + 'static,
{
    let id = NEXT_ID.with(|n| {
        let mut n = n.borrow_mut();
        let id = *n;
        *n += 1;
        id
    });
    CLICK_HANDLERS.with(|h| h.borrow_mut().push((id, Box::new(handler))));

    move || {
        CLICK_HANDLERS.with(|h| h.borrow_mut().retain(|(handler_id, _)| *handler_id != id));
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Dispatch a mouse event. Returns true if a click handler consumed it.
pub fn dispatch(mut event: MouseEvent) -> bool {
    event.target = hit_test(event.x, event.y);

    if HOVERED.with(|s| s.get()) != event.target {
        HOVERED.with(|s| s.set(event.target));
    }

    match (event.action, event.button) {
        (MouseAction::Down, MouseButton::Left) => {
            PRESSED.with(|p| *p.borrow_mut() = event.target);
            false
        }
        (MouseAction::Up, MouseButton::Left) => {
            let pressed = PRESSED.with(|p| p.borrow_mut().take());
            if event.target.is_some() && pressed == event.target {
                CLICK_HANDLERS.with(|h| h.borrow().iter().any(|(_, handler)| handler(&event)))
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Reset mouse state (for testing)
pub fn reset_mouse_state() {
    HIT_GRID.with(|g| *g.borrow_mut() = HitGrid::new(80, 24));
    HOVERED.with(|s| s.set(None));
    PRESSED.with(|p| *p.borrow_mut() = None);
    CLICK_HANDLERS.with(|h| h.borrow_mut().clear());
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
    fn test_hit_grid() {
        let mut grid = HitGrid::new(10, 10);
        assert_eq!(grid.get(5, 5), None);

        grid.fill_rect(2, 2, 4, 4, 42);
        assert_eq!(grid.get(3, 3), Some(42));
        assert_eq!(grid.get(5, 5), Some(42));
        assert_eq!(grid.get(6, 6), None);
        assert_eq!(grid.get(0, 0), None);

        grid.clear();
        assert_eq!(grid.get(3, 3), None);
    }

    #[test]
    fn test_hit_grid_clips_and_resizes() {
        let mut grid = HitGrid::new(4, 4);
        grid.fill_rect(2, 2, 10, 10, 1);
        assert_eq!(grid.get(3, 3), Some(1));
        assert_eq!(grid.get(4, 4), None);

        grid.resize(8, 8);
        assert_eq!(grid.size(), (8, 8));
        assert_eq!(grid.get(3, 3), None);
    }

    #[test]
    fn test_click_requires_same_target() {
        reset_mouse_state();
        fill_hit_rect(0, 0, 3, 1, 0);
        fill_hit_rect(5, 0, 3, 1, 1);

        let clicked = Rc::new(Cell::new(None));
        let c = clicked.clone();
        let _cleanup = on_click(move |e| {
            c.set(e.target);
            true
        });

        // Press on 0, release on 1: no click
        dispatch(MouseEvent::down(MouseButton::Left, 1, 0));
        assert!(!dispatch(MouseEvent::up(MouseButton::Left, 6, 0)));
        assert_eq!(clicked.get(), None);

        dispatch(MouseEvent::down(MouseButton::Left, 6, 0));
        assert!(dispatch(MouseEvent::up(MouseButton::Left, 7, 0)));
        assert_eq!(clicked.get(), Some(1));
    }

    #[test]
    fn test_click_on_empty_space_ignored() {
        reset_mouse_state();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _cleanup = on_click(move |_| {
            h.set(h.get() + 1);
            true
        });

        dispatch(MouseEvent::down(MouseButton::Left, 10, 10));
        assert!(!dispatch(MouseEvent::up(MouseButton::Left, 10, 10)));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_hover_tracking() {
        reset_mouse_state();
        fill_hit_rect(0, 0, 2, 2, 7);

        dispatch(MouseEvent::move_to(1, 1));
        assert_eq!(hovered_target(), Some(7));

        dispatch(MouseEvent::move_to(5, 5));
        assert_eq!(hovered_target(), None);
    }
}
