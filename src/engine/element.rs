//! Element capabilities.
//!
//! Widgets are assembled from small capabilities instead of a base-class
//! chain: [`Element`] is what the host renders and drives, [`Localized`]
//! and [`Themed`] are opt-in and delegate to a held
//! [`Localization`](crate::i18n::Localization) /
//! [`Theming`](crate::theme::Theming) value.

use std::rc::Rc;

use crate::i18n::Localization;
use crate::primitives::template::{Action, Node};
use crate::state::CelebrationTarget;
use crate::theme::{Theme, Theming};

/// Something the host can mount.
pub trait Element {
    /// Registered tag name.
    fn tag(&self) -> &'static str;

    /// Current structure. Reads signals, so calling it inside a derived
    /// tracks every input.
    fn template(&self) -> Node;

    /// Run a button action. Returns whether state changed.
    fn activate(&self, action: Action) -> bool;

    /// Theme to paint with.
    fn theme(&self) -> Theme;

    /// Attach the celebration effect that lives in the container.
    fn connect(&self, target: Rc<dyn CelebrationTarget>);

    fn disconnect(&self);
}

/// Localized strings through a held [`Localization`].
pub trait Localized {
    fn localization(&self) -> &Localization;

    fn t(&self, key: &str) -> String {
        self.localization().t(key)
    }

    fn set_locale(&self, locale: &str) {
        self.localization().set_locale(locale);
    }
}

/// Theme selection through a held [`Theming`].
pub trait Themed {
    fn theming(&self) -> &Theming;

    fn current_theme(&self) -> Theme {
        self.theming().theme()
    }
}
