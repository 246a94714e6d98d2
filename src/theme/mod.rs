//! Theme System for counter-app.
//!
//! Semantic colors for the counter: the host box, the value treatments
//! (18, 21, at-max, at-min), button focus and the disabled state. Two
//! presets ship with the crate: `ddd` (default) and `terminal` (ANSI only,
//! so it follows the user's palette).
//!
//! The active theme is a thread-local signal, so deriveds that read it
//! re-run when it changes. A widget can pin its own theme through
//! [`Theming`] instead.
//!
//! # Color Types
//!
//! - `ThemeColor::Default` - Uses terminal's default color
//! - `ThemeColor::Ansi(n)` - ANSI palette index (0-255)
//! - `ThemeColor::Rgb(rgba)` - Explicit RGB color
//! - `ThemeColor::Str(s)` - String to be parsed (hex or keyword)
//!
//! # Example
//!
//! ```ignore
//! use counter_app::theme::{set_theme, active_theme};
//!
//! set_theme("terminal")?;
//! let primary = active_theme().primary.resolve();
//! ```

use spark_signals::{signal, Signal};

use crate::error::{CounterError, Result};
use crate::primitives::template::{ValueClass, ValueTreatment};
use crate::types::Rgba;

pub mod presets;

pub use presets::*;

// =============================================================================
// ThemeColor - A color that can be ANSI, RGB, or string
// =============================================================================

/// Theme color.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ThemeColor {
    /// Use terminal's default color.
    #[default]
    Default,
    /// ANSI palette index (0-255).
    Ansi(u8),
    /// Explicit RGB color.
    Rgb(Rgba),
    /// String to be parsed (hex or keyword).
    Str(String),
}

impl ThemeColor {
    /// Resolve to Rgba. Unparseable strings come out magenta so they are
    /// easy to spot.
    pub fn resolve(&self) -> Rgba {
        match self {
            Self::Default => Rgba::TERMINAL_DEFAULT,
            Self::Ansi(i) => Rgba::ansi(*i),
            Self::Rgb(c) => *c,
            Self::Str(s) => Rgba::parse(s).unwrap_or(Rgba::MAGENTA),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    pub fn is_ansi(&self) -> bool {
        matches!(self, Self::Ansi(_))
    }
}

// =============================================================================
// From implementations for ergonomic construction
// =============================================================================

/// `()` means terminal default.
impl From<()> for ThemeColor {
    fn from(_: ()) -> Self {
        Self::Default
    }
}

/// `u8` is an ANSI index.
impl From<u8> for ThemeColor {
    fn from(index: u8) -> Self {
        Self::Ansi(index)
    }
}

impl From<Rgba> for ThemeColor {
    fn from(color: Rgba) -> Self {
        Self::Rgb(color)
    }
}

impl From<&str> for ThemeColor {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

/// `u32` is an RGB integer (0xRRGGBB).
impl From<u32> for ThemeColor {
    fn from(rgb: u32) -> Self {
        Self::Rgb(Rgba::from_rgb_int(rgb))
    }
}

// =============================================================================
// Theme - All semantic colors
// =============================================================================

/// Theme definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Preset name (e.g. "ddd").
    pub name: String,
    pub description: String,

    // =========================================================================
    // Host box
    // =========================================================================

    /// Foreground of the widget.
    pub primary: ThemeColor,
    /// Background of the widget.
    pub accent: ThemeColor,

    // =========================================================================
    // Value treatments
    // =========================================================================

    /// Value color at 18.
    pub count_18: ThemeColor,
    /// Value color at 21.
    pub count_21: ThemeColor,
    /// Value color at or above max.
    pub at_max: ThemeColor,
    /// Value color at or below min.
    pub at_min: ThemeColor,

    // =========================================================================
    // Chrome
    // =========================================================================

    /// Button background on hover or focus.
    pub focus: ThemeColor,
    /// Secondary text (label, slot).
    pub muted: ThemeColor,
    pub border: ThemeColor,
    /// Disabled button text.
    pub disabled: ThemeColor,
}

impl Default for Theme {
    fn default() -> Self {
        ddd()
    }
}

impl Theme {
    /// A theme with every slot set to the terminal default.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            primary: ThemeColor::Default,
            accent: ThemeColor::Default,
            count_18: ThemeColor::Default,
            count_21: ThemeColor::Default,
            at_max: ThemeColor::Default,
            at_min: ThemeColor::Default,
            focus: ThemeColor::Default,
            muted: ThemeColor::Default,
            border: ThemeColor::Default,
            disabled: ThemeColor::Default,
        }
    }

    /// Color for the count.
    ///
    /// The 18/21 treatment wins over the bound class; a plain value at a
    /// plain count uses `primary`.
    pub fn value_color(&self, class: ValueClass, treatment: ValueTreatment) -> &ThemeColor {
        match (treatment, class) {
            (ValueTreatment::Eighteen, _) => &self.count_18,
            (ValueTreatment::TwentyOne, _) => &self.count_21,
            (ValueTreatment::Plain, ValueClass::AtMin) => &self.at_min,
            (ValueTreatment::Plain, ValueClass::AtMax) => &self.at_max,
            (ValueTreatment::Plain, ValueClass::Neutral) => &self.primary,
        }
    }

    /// Colors cycled by confetti particles.
    pub fn confetti_palette(&self) -> [Rgba; 4] {
        [
            self.count_21.resolve(),
            self.count_18.resolve(),
            self.at_max.resolve(),
            self.at_min.resolve(),
        ]
    }
}

// =============================================================================
// Active theme
// =============================================================================

thread_local! {
    static ACTIVE_THEME: Signal<Theme> = signal(ddd());
}

/// The active global theme. Tracked inside deriveds.
pub fn active_theme() -> Theme {
    ACTIVE_THEME.with(|t| t.get())
}

/// Switch the global theme to a preset.
pub fn set_theme(name: &str) -> Result<()> {
    let theme = get_preset(name).ok_or_else(|| CounterError::UnknownTheme(name.to_string()))?;
    tracing::debug!(theme = %theme.name, "theme changed");
    ACTIVE_THEME.with(|t| t.set(theme));
    Ok(())
}

/// Install a theme that is not a preset.
pub fn set_custom_theme(theme: Theme) {
    tracing::debug!(theme = %theme.name, "custom theme installed");
    ACTIVE_THEME.with(|t| t.set(theme));
}

/// Reset to the default theme (for testing)
pub fn reset_theme_state() {
    ACTIVE_THEME.with(|t| t.set(ddd()));
}

// =============================================================================
// Theming - per-instance capability
// =============================================================================

/// Theming capability held by a widget.
///
/// Without an override it follows the active global theme.
#[derive(Clone)]
pub struct Theming {
    pinned: Signal<Option<Theme>>,
}

impl Theming {
    pub fn new() -> Self {
        Self { pinned: signal(None) }
    }

    /// Pin a preset for this instance only.
    pub fn use_preset(&self, name: &str) -> Result<()> {
        let theme = get_preset(name).ok_or_else(|| CounterError::UnknownTheme(name.to_string()))?;
        self.pinned.set(Some(theme));
        Ok(())
    }

    pub fn pin(&self, theme: Theme) {
        self.pinned.set(Some(theme));
    }

    /// Go back to following the global theme.
    pub fn unpin(&self) {
        self.pinned.set(None);
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.get().is_some()
    }

    /// The theme in effect for this instance.
    pub fn theme(&self) -> Theme {
        self.pinned.get().unwrap_or_else(active_theme)
    }
}

impl Default for Theming {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_color_resolve() {
        assert!(ThemeColor::Default.resolve().is_terminal_default());
        assert_eq!(ThemeColor::Ansi(12).resolve().ansi_index(), 12);
        assert_eq!(ThemeColor::Str("#ff0000".into()).resolve(), Rgba::rgb(255, 0, 0));
        assert_eq!(ThemeColor::Str("nope".into()).resolve(), Rgba::MAGENTA);
    }

    #[test]
    fn test_theme_color_from() {
        let c: ThemeColor = ().into();
        assert!(c.is_default());
        let c: ThemeColor = 3u8.into();
        assert!(c.is_ansi());
        let c: ThemeColor = 0x00ff00u32.into();
        assert_eq!(c, ThemeColor::Rgb(Rgba::rgb(0, 255, 0)));
    }

    #[test]
    fn test_treatment_beats_class() {
        let theme = ddd();
        // 21 at max=21 is both at-max and the celebration value
        assert_eq!(
            theme.value_color(ValueClass::AtMax, ValueTreatment::TwentyOne),
            &theme.count_21
        );
        assert_eq!(
            theme.value_color(ValueClass::AtMin, ValueTreatment::Eighteen),
            &theme.count_18
        );
        assert_eq!(theme.value_color(ValueClass::AtMin, ValueTreatment::Plain), &theme.at_min);
        assert_eq!(theme.value_color(ValueClass::AtMax, ValueTreatment::Plain), &theme.at_max);
        assert_eq!(theme.value_color(ValueClass::Neutral, ValueTreatment::Plain), &theme.primary);
    }

    #[test]
    fn test_treatment_colors_are_distinct() {
        for name in preset_names() {
            let theme = get_preset(name).unwrap();
            assert_ne!(theme.count_18, theme.count_21, "{name}");
        }
    }

    #[test]
    fn test_set_theme() {
        reset_theme_state();
        assert_eq!(active_theme().name, "ddd");

        set_theme("terminal").unwrap();
        assert_eq!(active_theme().name, "terminal");

        assert!(matches!(set_theme("neon"), Err(CounterError::UnknownTheme(n)) if n == "neon"));
        assert_eq!(active_theme().name, "terminal");
        reset_theme_state();
    }

    #[test]
    fn test_theming_pin_and_follow() {
        reset_theme_state();
        let theming = Theming::new();
        assert_eq!(theming.theme().name, "ddd");

        theming.use_preset("terminal").unwrap();
        assert!(theming.is_pinned());
        set_custom_theme(Theme::new("custom", ""));
        assert_eq!(theming.theme().name, "terminal");

        theming.unpin();
        assert_eq!(theming.theme().name, "custom");
        reset_theme_state();
    }
}
