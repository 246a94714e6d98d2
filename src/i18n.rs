//! Localization - string lookup for widget labels.
//!
//! A widget registers a [`LocaleRegistration`] (its context tag, where its
//! locale files live, and its default strings) with a
//! [`LocalizationProvider`]. Lookups resolve in order:
//!
//! 1. the provider's table for the current locale
//! 2. the registration's defaults
//! 3. the key itself
//!
//! The current locale is a signal, so a label derived from [`Localization::t`]
//! re-renders when it changes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{signal, Signal};

/// Locale used until one is set.
pub const DEFAULT_LOCALE: &str = "en";

// =============================================================================
// Registration + provider seam
// =============================================================================

/// What a widget hands to the provider when it connects.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleRegistration {
    /// Element tag the strings belong to.
    pub context: String,
    /// Directory holding per-locale tables.
    pub locales_path: String,
    /// Strings used when the provider has none.
    pub defaults: HashMap<String, String>,
}

impl LocaleRegistration {
    pub fn new(context: impl Into<String>, locales_path: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            locales_path: locales_path.into(),
            defaults: HashMap::new(),
        }
    }

    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }
}

/// Source of localized strings.
pub trait LocalizationProvider {
    /// Called once per widget instance when it connects.
    fn register(&self, registration: &LocaleRegistration);

    /// `None` if the provider has no string for this key.
    fn lookup(&self, locale: &str, context: &str, key: &str) -> Option<String>;
}

// =============================================================================
// StaticLocales - in-memory provider
// =============================================================================

/// In-memory provider. Tables are keyed by `(context, locale)`.
#[derive(Default)]
pub struct StaticLocales {
    tables: RefCell<HashMap<(String, String), HashMap<String, String>>>,
    registered: RefCell<Vec<LocaleRegistration>>,
}

impl StaticLocales {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one string.
    pub fn insert(&self, context: &str, locale: &str, key: &str, value: &str) {
        self.tables
            .borrow_mut()
            .entry((context.to_string(), locale.to_string()))
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Registrations seen so far.
    pub fn registrations(&self) -> Vec<LocaleRegistration> {
        self.registered.borrow().clone()
    }
}

impl LocalizationProvider for StaticLocales {
    fn register(&self, registration: &LocaleRegistration) {
        tracing::debug!(
            context = %registration.context,
            path = %registration.locales_path,
            "locale registration"
        );
        self.registered.borrow_mut().push(registration.clone());
    }

    fn lookup(&self, locale: &str, context: &str, key: &str) -> Option<String> {
        self.tables
            .borrow()
            .get(&(context.to_string(), locale.to_string()))
            .and_then(|table| table.get(key))
            .cloned()
    }
}

// =============================================================================
// Localization - per-widget capability
// =============================================================================

/// Localization capability held by a widget.
#[derive(Clone)]
pub struct Localization {
    registration: Rc<LocaleRegistration>,
    locale: Signal<String>,
    provider: Rc<RefCell<Option<Rc<dyn LocalizationProvider>>>>,
}

impl Localization {
    pub fn new(registration: LocaleRegistration) -> Self {
        Self {
            registration: Rc::new(registration),
            locale: signal(DEFAULT_LOCALE.to_string()),
            provider: Rc::new(RefCell::new(None)),
        }
    }

    pub fn registration(&self) -> &LocaleRegistration {
        &self.registration
    }

    /// Current locale. Tracked inside deriveds.
    pub fn locale(&self) -> String {
        self.locale.get()
    }

    pub fn set_locale(&self, locale: impl Into<String>) {
        let locale = locale.into();
        tracing::debug!(%locale, context = %self.registration.context, "locale changed");
        self.locale.set(locale);
    }

    /// Attach a provider and register with it.
    pub fn register_with(&self, provider: Rc<dyn LocalizationProvider>) {
        provider.register(&self.registration);
        *self.provider.borrow_mut() = Some(provider);
    }

    pub fn has_provider(&self) -> bool {
        self.provider.borrow().is_some()
    }

    /// Localized string for `key`.
    pub fn t(&self, key: &str) -> String {
        let locale = self.locale.get();
        let from_provider = self
            .provider
            .borrow()
            .as_ref()
            .and_then(|p| p.lookup(&locale, &self.registration.context, key));

        from_provider
            .or_else(|| self.registration.defaults.get(key).cloned())
            .unwrap_or_else(|| key.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
