//! Differential renderer.
//!
//! Compares the current frame to the previous one and only writes cells that
//! changed, inside a synchronized update so the terminal never shows half a
//! frame.
//!
//! # Algorithm
//!
//! 1. Begin synchronized update
//! 2. For each cell: skip if unchanged or a wide-char continuation,
//!    otherwise move, set colors/attributes if they differ from the last
//!    cell written, print
//! 3. End synchronized update and flush once
//! 4. Keep the frame for the next comparison

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};

use super::buffer::{FrameBuffer, CONTINUATION};
use crate::types::{Attr, Cell, Rgba};

/// Map our color to crossterm's.
pub fn to_crossterm_color(color: Rgba) -> Color {
    if color.is_terminal_default() || color.is_transparent() {
        Color::Reset
    } else if color.is_ansi() {
        Color::AnsiValue(color.ansi_index())
    } else {
        Color::Rgb {
            r: color.r.clamp(0, 255) as u8,
            g: color.g.clamp(0, 255) as u8,
            b: color.b.clamp(0, 255) as u8,
        }
    }
}

/// Style last written, to skip redundant escape sequences.
#[derive(Default)]
struct PenState {
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    attrs: Option<Attr>,
    /// Where the cursor sits after the last print.
    cursor: Option<(u16, u16)>,
}

/// Differential renderer over any writer.
pub struct DiffRenderer<W: Write> {
    out: W,
    pen: PenState,
    previous: Option<FrameBuffer>,
}

impl<W: Write> DiffRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pen: PenState::default(),
            previous: None,
        }
    }

    /// Render a frame, writing only changed cells.
    ///
    /// Returns true if any cells were written.
    pub fn render(&mut self, buffer: &FrameBuffer) -> io::Result<bool> {
        let previous = self
            .previous
            .take()
            .filter(|p| p.width() == buffer.width() && p.height() == buffer.height());

        queue!(self.out, BeginSynchronizedUpdate)?;
        self.pen.cursor = None;

        let mut has_changes = false;
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else { continue };
                let unchanged = previous.as_ref().and_then(|p| p.get(x, y)) == Some(cell);
                if unchanged || cell.ch == CONTINUATION {
                    continue;
                }
                has_changes = true;
                self.write_cell(x, y, cell)?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), EndSynchronizedUpdate)?;
        self.pen = PenState::default();
        self.out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(has_changes)
    }

    /// Redraw everything on the next render.
    ///
    /// Use after resize or when the screen is corrupted.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn write_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if self.pen.cursor != Some((x, y)) {
            queue!(self.out, MoveTo(x, y))?;
        }

        if self.pen.attrs != Some(cell.attrs) {
            // Reset drops colors too
            queue!(self.out, SetAttribute(Attribute::Reset))?;
            self.pen.fg = None;
            self.pen.bg = None;
            for (flag, attribute) in [
                (Attr::BOLD, Attribute::Bold),
                (Attr::DIM, Attribute::Dim),
                (Attr::ITALIC, Attribute::Italic),
                (Attr::UNDERLINE, Attribute::Underlined),
                (Attr::INVERSE, Attribute::Reverse),
            ] {
                if cell.attrs.contains(flag) {
                    queue!(self.out, SetAttribute(attribute))?;
                }
            }
            self.pen.attrs = Some(cell.attrs);
        }

        if self.pen.fg != Some(cell.fg) {
            queue!(self.out, SetForegroundColor(to_crossterm_color(cell.fg)))?;
            self.pen.fg = Some(cell.fg);
        }
        if self.pen.bg != Some(cell.bg) {
            queue!(self.out, SetBackgroundColor(to_crossterm_color(cell.bg)))?;
            self.pen.bg = Some(cell.bg);
        }

        queue!(self.out, Print(cell.ch))?;
        let advance = crate::layout::char_width(cell.ch).max(1);
        self.pen.cursor = Some((x.saturating_add(advance), y));
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn output(renderer: &DiffRenderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(renderer.writer()).into_owned()
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(to_crossterm_color(Rgba::TERMINAL_DEFAULT), Color::Reset);
        assert_eq!(to_crossterm_color(Rgba::ansi(9)), Color::AnsiValue(9));
        assert_eq!(to_crossterm_color(Rgba::rgb(1, 2, 3)), Color::Rgb { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn test_first_render_writes_everything() {
        let mut renderer = DiffRenderer::new(Vec::new());
        assert!(!renderer.has_previous());

        let mut buf = FrameBuffer::new(5, 1);
        buf.draw_text(0, 0, "hello", Rgba::WHITE, None, Attr::NONE);
        assert!(renderer.render(&buf).unwrap());
        assert!(renderer.has_previous());
        assert!(output(&renderer).contains("hello"));
    }

    #[test]
    fn test_unchanged_frame_writes_no_cells() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let mut buf = FrameBuffer::new(5, 1);
        buf.draw_text(0, 0, "QUIZ", Rgba::WHITE, None, Attr::NONE);
        renderer.render(&buf).unwrap();

        renderer.writer_mut().clear();
        assert!(!renderer.render(&buf).unwrap());
        assert!(!output(&renderer).contains('Q'));
    }

    #[test]
    fn test_only_changed_cells_written() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let mut buf = FrameBuffer::new(5, 1);
        buf.draw_text(0, 0, "QR", Rgba::WHITE, None, Attr::NONE);
        renderer.render(&buf).unwrap();

        renderer.writer_mut().clear();
        buf.draw_text(0, 0, "QZ", Rgba::WHITE, None, Attr::NONE);
        assert!(renderer.render(&buf).unwrap());
        let out = output(&renderer);
        assert!(out.contains('Z'));
        assert!(!out.contains('Q'));
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let mut buf = FrameBuffer::new(3, 1);
        buf.draw_text(0, 0, "abc", Rgba::WHITE, None, Attr::NONE);
        renderer.render(&buf).unwrap();

        renderer.invalidate();
        renderer.writer_mut().clear();
        assert!(renderer.render(&buf).unwrap());
        assert!(output(&renderer).contains("abc"));
    }
}
