//! Primitive types - Props and cleanup.

use crate::error::Result;
use crate::state::counter::{check_bounds, DEFAULT_COUNT, DEFAULT_MAX, DEFAULT_MIN};

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by handler registrations.
///
/// Call this to detach the handler.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Counter Props
// =============================================================================

/// Initial configuration of a counter.
///
/// # Example
///
/// ```ignore
/// let app = CounterApp::from_props(CounterProps {
///     count: 20,
///     title: "Guests".into(),
///     ..Default::default()
/// })?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CounterProps {
    pub count: i32,
    /// Inclusive lower bound.
    pub min: i32,
    /// Inclusive upper bound.
    pub max: i32,
    /// Label text. Empty means the localized default.
    pub title: String,
    /// Initial locale. `None` keeps the default.
    pub locale: Option<String>,
    /// Preset pinned for this instance. `None` follows the global theme.
    pub theme: Option<String>,
}

impl Default for CounterProps {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            title: String::new(),
            locale: None,
            theme: None,
        }
    }
}

impl CounterProps {
    /// Reject inverted bounds. The count may sit outside them.
    pub fn validate(&self) -> Result<()> {
        check_bounds(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CounterError;

    #[test]
    fn test_defaults() {
        let props = CounterProps::default();
        assert_eq!((props.count, props.min, props.max), (0, -5, 25));
        assert!(props.title.is_empty());
        assert!(props.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let props = CounterProps { min: 5, max: 4, ..Default::default() };
        assert!(matches!(props.validate(), Err(CounterError::InvalidBounds { min: 5, max: 4 })));
    }
}
