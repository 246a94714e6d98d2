//! Counter App - the counter widget.
//!
//! A bounded integer with `-` and `+` buttons. The value is colored by
//! where it sits:
//!
//! - `at-min` when `count <= min`, `at-max` when `count >= max` (at-min wins)
//! - 18 and 21 get their own colors, ahead of the bound class
//!
//! Reaching 21 pops the confetti container on the next scheduling turn.
//!
//! The widget is composed from [`CounterState`], a [`CelebrationTrigger`],
//! a [`Localization`] and a [`Theming`]; it implements [`Element`] so the
//! host can mount it.
//!
//! # Example
//!
//! ```ignore
//! use counter_app::primitives::{register, CounterApp};
//! use counter_app::pipeline::{mount, run};
//!
//! register()?;
//! let app = Rc::new(CounterApp::new());
//! app.set_title("Guests");
//! let handle = mount(app)?;
//! run(&handle)?;
//! ```

use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::engine::{define, Element, Localized, Themed};
use crate::error::Result;
use crate::i18n::{LocaleRegistration, Localization};
use crate::state::{
    CelebrationTarget, CelebrationTrigger, ConfettiContainer, CounterState, TargetSlot,
    TriggerState,
};
use crate::theme::{Theme, Theming};

use super::template::{Action, Node, ValueClass, ValueTreatment};
use super::types::CounterProps;

/// Registered tag name.
pub const TAG: &str = "counter-app";

/// Where the widget's locale tables live.
pub const LOCALES_PATH: &str = "locales/";

// =============================================================================
// Render State
// =============================================================================

/// Everything the template derives from `(count, min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub count: i32,
    pub at_min: bool,
    pub at_max: bool,
    pub class: ValueClass,
    pub increment_disabled: bool,
    pub decrement_disabled: bool,
    pub treatment: ValueTreatment,
}

impl RenderState {
    pub fn compute(count: i32, min: i32, max: i32) -> Self {
        let at_min = count <= min;
        let at_max = count >= max;
        let class = if at_min {
            ValueClass::AtMin
        } else if at_max {
            ValueClass::AtMax
        } else {
            ValueClass::Neutral
        };

        Self {
            count,
            at_min,
            at_max,
            class,
            // Equality, not the at_* comparisons: an out-of-range count
            // keeps its button enabled
            increment_disabled: count == max,
            decrement_disabled: count == min,
            treatment: ValueTreatment::for_count(count),
        }
    }
}

// =============================================================================
// CounterApp
// =============================================================================

pub struct CounterApp {
    state: CounterState,
    title: Signal<String>,
    slot: Signal<Option<String>>,
    localization: Localization,
    theming: Theming,
    confetti: TargetSlot,
    trigger: CelebrationTrigger,
}

impl CounterApp {
    /// A counter at 0 in -5..=25.
    pub fn new() -> Self {
        Self::build(CounterState::new())
    }

    /// A counter from explicit props.
    pub fn from_props(props: CounterProps) -> Result<Self> {
        props.validate()?;
        let app = Self::build(CounterState::with_values(props.count, props.min, props.max)?);

        app.title.set(props.title);
        if let Some(locale) = props.locale {
            app.localization.set_locale(locale);
        }
        if let Some(theme) = props.theme {
            app.theming.use_preset(&theme)?;
        }
        Ok(app)
    }

    fn build(state: CounterState) -> Self {
        let confetti = TargetSlot::new();
        let trigger = CelebrationTrigger::watch(state.count_signal(), confetti.clone());
        let localization = Localization::new(
            LocaleRegistration::new(TAG, LOCALES_PATH).with_default("title", "Title"),
        );

        tracing::debug!(count = state.count(), min = state.min(), max = state.max(), "counter created");

        Self {
            state,
            title: signal(String::new()),
            slot: signal(None),
            localization,
            theming: Theming::new(),
            confetti,
            trigger,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Add one unless at max.
    pub fn increment(&self) -> bool {
        self.state.increment()
    }

    /// Subtract one unless at min.
    pub fn decrement(&self) -> bool {
        self.state.decrement()
    }

    // =========================================================================
    // Observable configuration
    // =========================================================================

    pub fn count(&self) -> i32 {
        self.state.count()
    }

    pub fn min(&self) -> i32 {
        self.state.min()
    }

    pub fn max(&self) -> i32 {
        self.state.max()
    }

    pub fn title(&self) -> String {
        self.title.get()
    }

    /// Write the count directly. Not clamped.
    pub fn set_count(&self, count: i32) {
        self.state.set_count(count);
    }

    pub fn set_min(&self, min: i32) -> Result<()> {
        self.state.set_min(min)
    }

    pub fn set_max(&self, max: i32) -> Result<()> {
        self.state.set_max(max)
    }

    pub fn set_bounds(&self, min: i32, max: i32) -> Result<()> {
        self.state.set_bounds(min, max)
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.title.set(title.into());
    }

    /// Content shown under the buttons. `None` removes it.
    pub fn set_slot(&self, content: Option<String>) {
        self.slot.set(content);
    }

    pub fn state(&self) -> &CounterState {
        &self.state
    }

    // =========================================================================
    // Derived
    // =========================================================================

    pub fn render_state(&self) -> RenderState {
        RenderState::compute(self.state.count(), self.state.min(), self.state.max())
    }

    /// Title if set, else the localized default.
    pub fn label(&self) -> String {
        let title = self.title.get();
        if title.is_empty() {
            self.t("title")
        } else {
            title
        }
    }

    pub fn celebration_state(&self) -> TriggerState {
        self.trigger.state()
    }

    /// Transitions into 21 seen so far.
    pub fn celebrations(&self) -> u32 {
        self.trigger.fired_count()
    }

    pub fn is_connected(&self) -> bool {
        self.confetti.is_attached()
    }
}

impl Default for CounterApp {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Capabilities
// =============================================================================

impl Element for CounterApp {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn template(&self) -> Node {
        let rs = self.render_state();

        let mut children = vec![
            Node::Value {
                text: rs.count.to_string(),
                class: rs.class,
                treatment: rs.treatment,
            },
            Node::Buttons {
                children: vec![
                    Node::Button {
                        label: "-".to_string(),
                        action: Action::Decrement,
                        disabled: rs.decrement_disabled,
                    },
                    Node::Button {
                        label: "+".to_string(),
                        action: Action::Increment,
                        disabled: rs.increment_disabled,
                    },
                ],
            },
        ];
        if let Some(content) = self.slot.get() {
            children.push(Node::Slot {
                lines: content.lines().map(str::to_string).collect(),
            });
        }

        Node::Container {
            id: ConfettiContainer::ID.to_string(),
            children: vec![Node::Wrapper {
                label: self.label(),
                children,
            }],
        }
    }

    fn activate(&self, action: Action) -> bool {
        match action {
            Action::Increment => self.increment(),
            Action::Decrement => self.decrement(),
        }
    }

    fn theme(&self) -> Theme {
        self.current_theme()
    }

    fn connect(&self, target: Rc<dyn CelebrationTarget>) {
        tracing::debug!(tag = TAG, "celebration target connected");
        self.confetti.attach(target);
    }

    fn disconnect(&self) {
        self.confetti.detach();
    }
}

impl Localized for CounterApp {
    fn localization(&self) -> &Localization {
        &self.localization
    }
}

impl Themed for CounterApp {
    fn theming(&self) -> &Theming {
        &self.theming
    }
}

/// Register the `counter-app` tag. Call once during setup.
pub fn register() -> Result<()> {
    define(TAG, || -> Rc<dyn Element> { Rc::new(CounterApp::new()) })
}

// =============================================================================
// TESTS
// =============================================================================
