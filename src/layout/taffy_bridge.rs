//! Taffy Bridge - lays out a template tree with taffy's flexbox.
//!
//! Each template node becomes one taffy node. The widget is centered in the
//! terminal area by an outer root that fills it. Results come back as
//! absolute rectangles in the same pre-order as [`Node::pre_order`].

use taffy::{
    AlignItems, AvailableSpace, Dimension, Display, FlexDirection, JustifyContent,
    LengthPercentage, LengthPercentageAuto, NodeId, Rect as TaffyRect, Size, Style, TaffyTree,
};

use crate::error::Result;
use crate::primitives::template::Node;
use crate::types::Rect;

use super::text_measure::string_width;

// =============================================================================
// Metrics
// =============================================================================

/// Narrowest the widget box gets.
pub const CONTAINER_MIN_WIDTH: u16 = 24;
/// Horizontal padding between the box edge and the bordered wrapper.
pub const CONTAINER_PAD_X: u16 = 3;
/// Cells taken by one button, brackets included ("[ + ]").
pub const BUTTON_WIDTH: u16 = 5;
/// Space between the two buttons.
pub const BUTTON_GAP: u16 = 2;

// =============================================================================
// Style helpers
// =============================================================================

fn cells(n: u16) -> LengthPercentage {
    LengthPercentage::Length(n as f32)
}

fn edges(top: u16, right: u16, bottom: u16, left: u16) -> TaffyRect<LengthPercentage> {
    TaffyRect {
        top: cells(top),
        right: cells(right),
        bottom: cells(bottom),
        left: cells(left),
    }
}

fn margin_y(top: u16, bottom: u16) -> TaffyRect<LengthPercentageAuto> {
    TaffyRect {
        top: LengthPercentageAuto::Length(top as f32),
        right: LengthPercentageAuto::Length(0.0),
        bottom: LengthPercentageAuto::Length(bottom as f32),
        left: LengthPercentageAuto::Length(0.0),
    }
}

fn fixed(width: u16, height: u16) -> Size<Dimension> {
    Size {
        width: Dimension::Length(width as f32),
        height: Dimension::Length(height as f32),
    }
}

fn column() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        align_items: Some(AlignItems::Center),
        ..Default::default()
    }
}

/// Style of one template node.
fn style_for(node: &Node) -> Style {
    match node {
        Node::Container { .. } => Style {
            padding: edges(1, CONTAINER_PAD_X, 1, CONTAINER_PAD_X),
            min_size: Size {
                width: Dimension::Length(CONTAINER_MIN_WIDTH as f32),
                height: Dimension::Auto,
            },
            ..column()
        },
        Node::Wrapper { label, .. } => Style {
            border: edges(1, 1, 1, 1),
            padding: edges(0, 2, 0, 2),
            // Room for the label in the top edge
            min_size: Size {
                width: Dimension::Length(string_width(label).saturating_add(4) as f32),
                height: Dimension::Auto,
            },
            ..column()
        },
        Node::Value { text, .. } => Style {
            size: fixed(string_width(text), 1),
            margin: margin_y(1, 1),
            flex_shrink: 0.0,
            ..Default::default()
        },
        Node::Buttons { .. } => Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            justify_content: Some(JustifyContent::Center),
            gap: Size {
                width: cells(BUTTON_GAP),
                height: cells(0),
            },
            ..Default::default()
        },
        Node::Button { .. } => Style {
            size: fixed(BUTTON_WIDTH, 1),
            flex_shrink: 0.0,
            ..Default::default()
        },
        Node::Slot { lines } => {
            let width = lines.iter().map(|l| string_width(l)).max().unwrap_or(0);
            Style {
                size: fixed(width, u16::try_from(lines.len()).unwrap_or(u16::MAX)),
                margin: margin_y(1, 0),
                ..Default::default()
            }
        }
    }
}

// =============================================================================
// Tree building
// =============================================================================

/// Add `node` and its subtree. `order` collects `(taffy id, parent slot)` in
/// pre-order.
fn build(
    tree: &mut TaffyTree<()>,
    node: &Node,
    parent: Option<usize>,
    order: &mut Vec<(NodeId, Option<usize>)>,
) -> Result<NodeId> {
    let slot = order.len();
    let id = tree.new_leaf(style_for(node))?;
    order.push((id, parent));

    for child in node.children() {
        let child_id = build(tree, child, Some(slot), order)?;
        tree.add_child(id, child_id)?;
    }
    Ok(id)
}

// =============================================================================
// Public API
// =============================================================================

/// Lay out `root` centered in a `width` x `height` area.
///
/// Returns one rectangle per node of `root.pre_order()`, in absolute cells.
pub fn compute_layout(root: &Node, width: u16, height: u16) -> Result<Vec<Rect>> {
    let mut tree: TaffyTree<()> = TaffyTree::new();

    let mut order = Vec::new();
    let widget = build(&mut tree, root, None, &mut order)?;

    let screen = tree.new_with_children(
        Style {
            display: Display::Flex,
            size: fixed(width, height),
            justify_content: Some(JustifyContent::Center),
            align_items: Some(AlignItems::Center),
            ..Default::default()
        },
        &[widget],
    )?;

    tree.compute_layout(
        screen,
        Size {
            width: AvailableSpace::Definite(width as f32),
            height: AvailableSpace::Definite(height as f32),
        },
    )?;

    // Parents come before children, so their absolute origin is known
    let mut origins: Vec<(f32, f32)> = Vec::with_capacity(order.len());
    let mut rects = Vec::with_capacity(order.len());
    for (id, parent) in order {
        let layout = tree.layout(id)?;
        let (px, py) = parent.map(|p| origins[p]).unwrap_or((0.0, 0.0));
        let x = px + layout.location.x;
        let y = py + layout.location.y;
        origins.push((x, y));
        rects.push(Rect::new(
            to_cells(x),
            to_cells(y),
            to_cells(layout.size.width),
            to_cells(layout.size.height),
        ));
    }

    tracing::trace!(nodes = rects.len(), width, height, "layout computed");
    Ok(rects)
}

fn to_cells(v: f32) -> u16 {
    v.round().clamp(0.0, u16::MAX as f32) as u16
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::template::{Action, ValueClass, ValueTreatment};

    fn counter_tree(slot: Option<Vec<&str>>) -> Node {
        let mut children = vec![
            Node::Value {
                text: "0".into(),
                class: ValueClass::Neutral,
                treatment: ValueTreatment::Plain,
            },
            Node::Buttons {
                children: vec![
                    Node::Button { label: "-".into(), action: Action::Decrement, disabled: false },
                    Node::Button { label: "+".into(), action: Action::Increment, disabled: false },
                ],
            },
        ];
        if let Some(lines) = slot {
            children.push(Node::Slot {
                lines: lines.into_iter().map(String::from).collect(),
            });
        }
        Node::Container {
            id: "confetti".into(),
            children: vec![Node::Wrapper { label: "Title".into(), children }],
        }
    }

    fn inside(inner: &Rect, outer: &Rect) -> bool {
        inner.x >= outer.x
            && inner.y >= outer.y
            && inner.x + inner.width <= outer.x + outer.width
            && inner.y + inner.height <= outer.y + outer.height
    }

    #[test]
    fn test_one_rect_per_node() {
        let tree = counter_tree(None);
        let rects = compute_layout(&tree, 80, 24).unwrap();
        assert_eq!(rects.len(), tree.pre_order().len());
    }

    #[test]
    fn test_geometry() {
        let tree = counter_tree(None);
        let rects = compute_layout(&tree, 80, 24).unwrap();
        let [container, wrapper, value, buttons, minus, plus] = rects[..] else {
            panic!("unexpected node count {}", rects.len());
        };

        assert!(container.width >= CONTAINER_MIN_WIDTH);
        assert!(inside(&wrapper, &container));
        assert_eq!(wrapper.x, container.x + CONTAINER_PAD_X);
        assert!(inside(&value, &wrapper));
        assert!(inside(&buttons, &wrapper));

        assert_eq!((value.width, value.height), (1, 1));
        assert!(buttons.y > value.y);

        assert_eq!((minus.width, minus.height), (BUTTON_WIDTH, 1));
        assert_eq!(minus.y, plus.y);
        assert_eq!(plus.x, minus.x + BUTTON_WIDTH + BUTTON_GAP);
    }

    #[test]
    fn test_centered_in_area() {
        let rects = compute_layout(&counter_tree(None), 80, 24).unwrap();
        let container = rects[0];
        let left = container.x;
        let right = 80 - (container.x + container.width);
        assert!(left.abs_diff(right) <= 1, "left {left} right {right}");
        let top = container.y;
        let bottom = 24 - (container.y + container.height);
        assert!(top.abs_diff(bottom) <= 1, "top {top} bottom {bottom}");
    }

    #[test]
    fn test_slot_below_buttons() {
        let tree = counter_tree(Some(vec!["hello", "world!"]));
        let rects = compute_layout(&tree, 80, 24).unwrap();
        let buttons = rects[3];
        let slot = rects[6];
        assert_eq!((slot.width, slot.height), (6, 2));
        assert!(slot.y > buttons.y);
        assert!(inside(&slot, &rects[1]));
    }

    #[test]
    fn test_wrapper_fits_long_label() {
        let mut tree = counter_tree(None);
        if let Node::Container { children, .. } = &mut tree {
            if let Node::Wrapper { label, .. } = &mut children[0] {
                *label = "A considerably long label".into();
            }
        }
        let rects = compute_layout(&tree, 80, 24).unwrap();
        assert!(rects[1].width >= string_width("A considerably long label") + 4);
    }

    #[test]
    fn test_label_wider_than_cell_range_saturates() {
        let mut tree = counter_tree(None);
        if let Node::Container { children, .. } = &mut tree {
            if let Node::Wrapper { label, .. } = &mut children[0] {
                *label = "x".repeat(70_000);
            }
        }
        let rects = compute_layout(&tree, 80, 24).unwrap();
        assert_eq!(rects.len(), tree.pre_order().len());
        assert_eq!(rects[1].width, u16::MAX);
    }

    #[test]
    fn test_slot_height_saturates() {
        let lines: Vec<String> = vec!["."; 70_000].into_iter().map(String::from).collect();
        let rects = compute_layout(&Node::Slot { lines }, 80, 24).unwrap();
        assert_eq!(rects[0].height, u16::MAX);
    }
}
