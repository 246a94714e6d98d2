//! Template - the structural description a widget emits each render.
//!
//! ```text
//! Container#confetti
//!   Wrapper(label)
//!     Value(text, class, treatment)
//!     Buttons
//!       Button("-", Decrement)
//!       Button("+", Increment)
//!     Slot(content)
//! ```
//!
//! The tree is plain data. Layout sizes it and the painter draws it; neither
//! knows about the counter.

/// What activating a button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Increment,
    Decrement,
}

/// Boundary class of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueClass {
    #[default]
    Neutral,
    AtMin,
    AtMax,
}

impl ValueClass {
    /// Class name as it would appear on the element (`""` when neutral).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "",
            Self::AtMin => "at-min",
            Self::AtMax => "at-max",
        }
    }
}

/// Special color treatment for particular values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueTreatment {
    #[default]
    Plain,
    Eighteen,
    TwentyOne,
}

impl ValueTreatment {
    pub fn for_count(count: i32) -> Self {
        match count {
            18 => Self::Eighteen,
            21 => Self::TwentyOne,
            _ => Self::Plain,
        }
    }
}

/// One node of the emitted structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Host of the celebration effect. Fills the widget.
    Container { id: String, children: Vec<Node> },
    /// Bordered box with the label in its top edge.
    Wrapper { label: String, children: Vec<Node> },
    /// The count.
    Value {
        text: String,
        class: ValueClass,
        treatment: ValueTreatment,
    },
    /// Horizontal button row.
    Buttons { children: Vec<Node> },
    Button {
        label: String,
        action: Action,
        disabled: bool,
    },
    /// Embedder content, one entry per line.
    Slot { lines: Vec<String> },
}

impl Node {
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Container { children, .. }
            | Self::Wrapper { children, .. }
            | Self::Buttons { children } => children,
            _ => &[],
        }
    }

    /// All nodes, parents before children.
    pub fn pre_order(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        fn walk<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
            out.push(node);
            for child in node.children() {
                walk(child, out);
            }
        }
        walk(self, &mut out);
        out
    }

    /// Buttons in document order.
    pub fn buttons(&self) -> Vec<(Action, bool)> {
        self.pre_order()
            .into_iter()
            .filter_map(|n| match n {
                Node::Button { action, disabled, .. } => Some((*action, *disabled)),
                _ => None,
            })
            .collect()
    }

    pub fn value(&self) -> Option<&Node> {
        self.pre_order()
            .into_iter()
            .find(|n| matches!(n, Node::Value { .. }))
    }

    pub fn is_button_disabled(&self, action: Action) -> Option<bool> {
        self.buttons()
            .into_iter()
            .find(|(a, _)| *a == action)
            .map(|(_, disabled)| disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::Container {
            id: "confetti".into(),
            children: vec![Node::Wrapper {
                label: "Title".into(),
                children: vec![
                    Node::Value {
                        text: "3".into(),
                        class: ValueClass::Neutral,
                        treatment: ValueTreatment::Plain,
                    },
                    Node::Buttons {
                        children: vec![
                            Node::Button { label: "-".into(), action: Action::Decrement, disabled: true },
                            Node::Button { label: "+".into(), action: Action::Increment, disabled: false },
                        ],
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_pre_order() {
        let tree = sample();
        let kinds: Vec<&str> = tree
            .pre_order()
            .iter()
            .map(|n| match n {
                Node::Container { .. } => "container",
                Node::Wrapper { .. } => "wrapper",
                Node::Value { .. } => "value",
                Node::Buttons { .. } => "buttons",
                Node::Button { .. } => "button",
                Node::Slot { .. } => "slot",
            })
            .collect();
        assert_eq!(kinds, ["container", "wrapper", "value", "buttons", "button", "button"]);
    }

    #[test]
    fn test_button_lookup() {
        let tree = sample();
        assert_eq!(tree.is_button_disabled(Action::Decrement), Some(true));
        assert_eq!(tree.is_button_disabled(Action::Increment), Some(false));
    }

    #[test]
    fn test_treatment_for_count() {
        assert_eq!(ValueTreatment::for_count(18), ValueTreatment::Eighteen);
        assert_eq!(ValueTreatment::for_count(21), ValueTreatment::TwentyOne);
        assert_eq!(ValueTreatment::for_count(20), ValueTreatment::Plain);
        assert_eq!(ValueClass::AtMin.as_str(), "at-min");
        assert_eq!(ValueClass::Neutral.as_str(), "");
    }
}
