//! Element Registry - explicit tag registration.
//!
//! Nothing registers itself on import. Application setup calls each
//! widget's `register()` once, which lands here.
//!
//! Tag names follow custom-element rules: lowercase ASCII, starting with a
//! letter, with at least one hyphen.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::{CounterError, Result};

use super::element::Element;

/// Builds a fresh instance of an element.
pub type Constructor = Rc<dyn Fn() -> Rc<dyn Element>>;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Tag name to constructor, sorted for stable listing.
    static DEFINITIONS: RefCell<BTreeMap<String, Constructor>> = RefCell::new(BTreeMap::new());
}

// =============================================================================
// Tag Validation
// =============================================================================

/// Check a tag name. Returns the offending tag on failure.
pub fn validate_tag(tag: &str) -> Result<()> {
    let starts_with_letter = tag.chars().next().is_some_and(|c| c.is_ascii_lowercase());
    let allowed = tag
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' || c == '.');

    if starts_with_letter && allowed && tag.contains('-') {
        Ok(())
    } else {
        Err(CounterError::InvalidTag(tag.to_string()))
    }
}

// =============================================================================
// Definition
// =============================================================================

/// Register an element constructor under `tag`.
pub fn define<F>(tag: &str, constructor: F) -> Result<()>
where
    F: Fn() -> Rc<dyn Element> + 'static,
{
    validate_tag(tag)?;

    DEFINITIONS.with(|defs| {
        let mut defs = defs.borrow_mut();
        if defs.contains_key(tag) {
            return Err(CounterError::AlreadyDefined(tag.to_string()));
        }
        defs.insert(tag.to_string(), Rc::new(constructor));
        tracing::debug!(tag, "element defined");
        Ok(())
    })
}

pub fn is_defined(tag: &str) -> bool {
    DEFINITIONS.with(|defs| defs.borrow().contains_key(tag))
}

/// All registered tags, sorted.
pub fn defined_tags() -> Vec<String> {
    DEFINITIONS.with(|defs| defs.borrow().keys().cloned().collect())
}

/// Build a new instance of a registered element.
pub fn create(tag: &str) -> Result<Rc<dyn Element>> {
    // Clone the constructor out so it may itself touch the registry
    let constructor = DEFINITIONS
        .with(|defs| defs.borrow().get(tag).cloned())
        .ok_or_else(|| CounterError::UndefinedElement(tag.to_string()))?;
    Ok(constructor())
}

/// Reset all registry state (for testing).
pub fn reset_registry() {
    DEFINITIONS.with(|defs| defs.borrow_mut().clear());
}

// =============================================================================
// Tests
// =============================================================================
