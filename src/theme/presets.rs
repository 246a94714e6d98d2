//! Theme presets.
//!
//! - ddd (default - design-system palette)
//! - terminal (ANSI only)

use super::{Theme, ThemeColor};
use crate::types::Rgba;

// =============================================================================
// DDD Theme (Default)
// =============================================================================

/// Design-system palette: navy on limestone, yellow at 18, pink at 21.
pub fn ddd() -> Theme {
    Theme {
        name: "ddd".to_string(),
        description: "Design system colors".to_string(),
        // Host box
        primary: ThemeColor::Rgb(Rgba::from_rgb_int(0x1e407c)), // beaver blue
        accent: ThemeColor::Rgb(Rgba::from_rgb_int(0xe4e5e7)),  // limestone light
        // Value treatments
        count_18: ThemeColor::Rgb(Rgba::from_rgb_int(0xffd100)), // keystone yellow
        count_21: ThemeColor::Rgb(Rgba::from_rgb_int(0xbc204b)), // 87 pink
        at_max: ThemeColor::Rgb(Rgba::from_rgb_int(0xbf8226)),   // roar golden
        at_min: ThemeColor::Rgb(Rgba::from_rgb_int(0x009cde)),   // global neon
        // Chrome
        focus: ThemeColor::Rgb(Rgba::from_rgb_int(0x8dc4e8)), // navy 40
        muted: ThemeColor::Rgb(Rgba::from_rgb_int(0x314d64)),
        border: ThemeColor::Rgb(Rgba::from_rgb_int(0x96bee6)),
        disabled: ThemeColor::Rgb(Rgba::from_rgb_int(0xa2aaad)),
    }
}

// =============================================================================
// Terminal Theme
// =============================================================================

/// ANSI colors only, to respect the user's terminal theme.
pub fn terminal() -> Theme {
    Theme {
        name: "terminal".to_string(),
        description: "Uses terminal default colors".to_string(),
        primary: ThemeColor::Default,
        accent: ThemeColor::Default,
        count_18: ThemeColor::Ansi(11), // bright yellow
        count_21: ThemeColor::Ansi(13), // bright magenta
        at_max: ThemeColor::Ansi(3),    // yellow
        at_min: ThemeColor::Ansi(14),   // bright cyan
        focus: ThemeColor::Ansi(4),
        muted: ThemeColor::Ansi(8),
        border: ThemeColor::Ansi(7),
        disabled: ThemeColor::Ansi(8),
    }
}

// =============================================================================
// Preset Lookup
// =============================================================================

/// Get a preset theme by name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use counter_app::theme::get_preset;
///
/// assert_eq!(get_preset("Terminal").unwrap().name, "terminal");
/// assert!(get_preset("dracula").is_none());
/// ```
pub fn get_preset(name: &str) -> Option<Theme> {
    match name.trim().to_lowercase().as_str() {
        "ddd" => Some(ddd()),
        "terminal" => Some(terminal()),
        _ => None,
    }
}

/// List all available preset names.
pub fn preset_names() -> &'static [&'static str] {
    &["ddd", "terminal"]
}

// =============================================================================
// Tests
// =============================================================================
