//! FrameBuffer and drawing primitives.
//!
//! A 2D grid of [`Cell`]s holding what should be on screen. The painter
//! draws into it; the diff renderer writes it out.
//!
//! - **Flat storage**: `Vec<Cell>` with row-major indexing.
//! - **Clipping**: every draw call is clipped to the buffer.
//! - **Wide characters**: the cell after a double-width glyph holds `'\0'`
//!   as a continuation marker and is skipped on output.
//! - **Backgrounds**: `None` keeps the background already in the cell.

use crate::layout::{char_width, string_width};
use crate::types::{Attr, BorderStyle, Cell, Rect, Rgba};

/// Marker stored in the cell after a wide character.
pub const CONTINUATION: char = '\0';

// =============================================================================
// FrameBuffer
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    /// Create a new buffer with a specific background color.
    pub fn with_background(width: u16, height: u16, bg: Rgba) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.clear_with_bg(bg);
        buffer
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Resize, clearing all contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width as usize * height as usize];
    }

    pub fn clear_with_bg(&mut self, bg: Rgba) {
        for cell in &mut self.cells {
            *cell = Cell { bg, ..Cell::default() };
        }
    }

    /// Text of one row, continuation cells dropped. Mostly for tests.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|c| c.ch)
            .filter(|&ch| ch != CONTINUATION)
            .collect()
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Set a single cell. Returns true if it was inside the buffer.
    pub fn set_cell(&mut self, x: u16, y: u16, ch: char, fg: Rgba, bg: Option<Rgba>, attrs: Attr) -> bool {
        match self.get_mut(x, y) {
            Some(cell) => {
                cell.ch = ch;
                cell.fg = fg;
                if let Some(bg) = bg.filter(|bg| !bg.is_transparent()) {
                    cell.bg = bg;
                }
                cell.attrs = attrs;
                true
            }
            None => false,
        }
    }

    /// Fill a rectangle with a background color, erasing its text.
    pub fn fill_rect(&mut self, rect: Rect, bg: Rgba) {
        let x2 = rect.x.saturating_add(rect.width).min(self.width);
        let y2 = rect.y.saturating_add(rect.height).min(self.height);
        for y in rect.y..y2 {
            for x in rect.x..x2 {
                let idx = self.index(x, y);
                self.cells[idx] = Cell { bg, ..Cell::default() };
            }
        }
    }

    /// Draw text at a position. Returns the number of cells used.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgba, bg: Option<Rgba>, attrs: Attr) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if self.set_cell(col, y, ch, fg, bg, attrs) && w == 2 {
                self.set_cell(col + 1, y, CONTINUATION, fg, bg, attrs);
            }
            col = col.saturating_add(w);
        }
        col.saturating_sub(x)
    }

    /// Draw text centered within `width` cells starting at `x`.
    pub fn draw_text_centered(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        text: &str,
        fg: Rgba,
        bg: Option<Rgba>,
        attrs: Attr,
    ) -> u16 {
        let offset = width.saturating_sub(string_width(text)) / 2;
        self.draw_text(x.saturating_add(offset), y, text, fg, bg, attrs)
    }

    /// Draw a border around a rectangle.
    pub fn draw_border(&mut self, rect: Rect, style: BorderStyle, color: Rgba, bg: Option<Rgba>) {
        if rect.width < 2 || rect.height < 2 || style == BorderStyle::None {
            return;
        }

        let (horiz, vert, tl, tr, br, bl) = style.chars();
        let x2 = rect.x.saturating_add(rect.width - 1);
        let y2 = rect.y.saturating_add(rect.height - 1);

        self.set_cell(rect.x, rect.y, tl, color, bg, Attr::NONE);
        self.set_cell(x2, rect.y, tr, color, bg, Attr::NONE);
        self.set_cell(x2, y2, br, color, bg, Attr::NONE);
        self.set_cell(rect.x, y2, bl, color, bg, Attr::NONE);

        for col in rect.x.saturating_add(1)..x2.min(self.width) {
            self.set_cell(col, rect.y, horiz, color, bg, Attr::NONE);
            self.set_cell(col, y2, horiz, color, bg, Attr::NONE);
        }
        for row in rect.y.saturating_add(1)..y2.min(self.height) {
            self.set_cell(rect.x, row, vert, color, bg, Attr::NONE);
            self.set_cell(x2, row, vert, color, bg, Attr::NONE);
        }
    }

    /// Write a title into the top edge of a border, one cell in from the
    /// corner and padded by a space on each side. Cut to fit.
    pub fn draw_border_title(&mut self, rect: Rect, title: &str, fg: Rgba, bg: Option<Rgba>, attrs: Attr) {
        if title.is_empty() || rect.width < 5 {
            return;
        }
        let room = rect.width - 4;
        let title = crate::layout::truncate_text(title, room);
        let start = rect.x.saturating_add(1);
        let x = start.saturating_add(self.draw_text(start, rect.y, " ", fg, bg, Attr::NONE));
        let used = self.draw_text(x, rect.y, &title, fg, bg, attrs);
        self.draw_text(x.saturating_add(used), rect.y, " ", fg, bg, Attr::NONE);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_get() {
        let buf = FrameBuffer::new(4, 2);
        assert_eq!(buf.get(3, 1), Some(&Cell::default()));
        assert_eq!(buf.get(4, 0), None);
    }

    #[test]
    fn test_set_cell_keeps_background_when_none() {
        let mut buf = FrameBuffer::with_background(3, 1, Rgba::BLACK);
        buf.set_cell(0, 0, 'x', Rgba::WHITE, None, Attr::BOLD);
        let cell = buf.get(0, 0).unwrap();
        assert_eq!(cell.ch, 'x');
        assert_eq!(cell.bg, Rgba::BLACK);
        assert_eq!(cell.attrs, Attr::BOLD);
        assert!(!buf.set_cell(9, 0, 'y', Rgba::WHITE, None, Attr::NONE));
    }

    #[test]
    fn test_draw_text_clips_and_marks_wide() {
        let mut buf = FrameBuffer::new(6, 1);
        assert_eq!(buf.draw_text(4, 0, "abc", Rgba::WHITE, None, Attr::NONE), 2);
        assert_eq!(buf.row_text(0), "    ab");

        let mut buf = FrameBuffer::new(4, 1);
        buf.draw_text(0, 0, "日x", Rgba::WHITE, None, Attr::NONE);
        assert_eq!(buf.get(1, 0).unwrap().ch, CONTINUATION);
        assert_eq!(buf.row_text(0), "日x ");
    }

    #[test]
    fn test_draw_text_centered() {
        let mut buf = FrameBuffer::new(7, 1);
        buf.draw_text_centered(0, 0, 7, "21", Rgba::WHITE, None, Attr::NONE);
        assert_eq!(buf.row_text(0), "  21   ");
    }

    #[test]
    fn test_border_with_title() {
        let mut buf = FrameBuffer::new(10, 3);
        let rect = Rect::new(0, 0, 10, 3);
        buf.draw_border(rect, BorderStyle::Single, Rgba::WHITE, None);
        buf.draw_border_title(rect, "Title", Rgba::WHITE, None, Attr::BOLD);
        assert_eq!(buf.row_text(0), "┌ Title ─┐");
        assert_eq!(buf.row_text(1), "│        │");
        assert_eq!(buf.row_text(2), "└────────┘");
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut buf = FrameBuffer::new(3, 3);
        buf.draw_text(0, 2, "abc", Rgba::WHITE, None, Attr::NONE);
        buf.fill_rect(Rect::new(1, 1, 10, 10), Rgba::GRAY);
        assert_eq!(buf.get(2, 2).unwrap().bg, Rgba::GRAY);
        assert_eq!(buf.get(0, 0).unwrap().bg, Rgba::TERMINAL_DEFAULT);
        assert_eq!(buf.row_text(2), "a  ");
    }

    #[test]
    fn test_border_at_cell_range_edge() {
        let mut buf = FrameBuffer::new(4, 3);
        let rect = Rect::new(0, 0, u16::MAX, 3);
        buf.draw_border(rect, BorderStyle::Rounded, Rgba::WHITE, None);
        buf.draw_border_title(rect, &"x".repeat(70_000), Rgba::WHITE, None, Attr::NONE);
        assert_eq!(buf.row_text(0), "╭ xx");
        assert_eq!(buf.row_text(1), "│   ");

        assert_eq!(buf.row_text(2), "╰───");

        // Entirely off-screen, corners past the cell range
        buf.draw_border(Rect::new(u16::MAX - 2, 1, 10, 10), BorderStyle::Single, Rgba::WHITE, None);
        assert_eq!(buf.row_text(1), "│   ");
        assert_eq!(buf.row_text(2), "╰───");
    }
}
