//! Terminal state - size signals and mode switching.
//!
//! Width and height are signals so the frame derived re-runs on resize.

use std::io::Write;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use spark_signals::{signal, Signal};

thread_local! {
    static TERMINAL_WIDTH: Signal<u16> = signal(80);
    static TERMINAL_HEIGHT: Signal<u16> = signal(24);
}

pub fn terminal_width() -> u16 {
    TERMINAL_WIDTH.with(|s| s.get())
}

pub fn terminal_height() -> u16 {
    TERMINAL_HEIGHT.with(|s| s.get())
}

pub fn terminal_size() -> (u16, u16) {
    (terminal_width(), terminal_height())
}

pub fn set_terminal_size(width: u16, height: u16) {
    TERMINAL_WIDTH.with(|s| s.set(width));
    TERMINAL_HEIGHT.with(|s| s.set(height));
}

pub fn terminal_width_signal() -> Signal<u16> {
    TERMINAL_WIDTH.with(|s| s.clone())
}

pub fn terminal_height_signal() -> Signal<u16> {
    TERMINAL_HEIGHT.with(|s| s.clone())
}

/// Set the size signals from the real terminal, if there is one.
pub fn detect_terminal_size() {
    if let Ok((width, height)) = crossterm::terminal::size() {
        set_terminal_size(width, height);
    }
}

/// Raw mode, alternate screen, hidden cursor.
pub fn enter_fullscreen<W: Write>(out: &mut W) -> std::io::Result<()> {
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, Hide)
}

/// Undo [`enter_fullscreen`].
pub fn exit_fullscreen<W: Write>(out: &mut W) -> std::io::Result<()> {
    execute!(out, Show, LeaveAlternateScreen)?;
    disable_raw_mode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_size() {
        set_terminal_size(120, 40);
        assert_eq!(terminal_width(), 120);
        assert_eq!(terminal_height(), 40);
        assert_eq!(terminal_width_signal().get(), 120);
    }
}
