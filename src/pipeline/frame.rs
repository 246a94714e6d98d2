//! Frame - paints a template into a frame buffer.
//!
//! Pure: takes the template, the layout rectangles and a [`PaintContext`],
//! returns the filled buffer plus the hit regions for enabled buttons. The
//! mount's render effect applies the hit regions and writes the buffer out.

use crate::layout::compute_layout;
use crate::primitives::template::{Action, Node};
use crate::renderer::FrameBuffer;
use crate::state::confetti::particles;
use crate::theme::Theme;
use crate::types::{Attr, BorderStyle, Rect, Rgba};

// =============================================================================
// Types
// =============================================================================

/// A clickable area. `target` is what the hit grid stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRegion {
    pub rect: Rect,
    pub action: Action,
    pub target: usize,
}

/// Hit-grid id for a button action.
pub fn target_id(action: Action) -> usize {
    match action {
        Action::Decrement => 0,
        Action::Increment => 1,
    }
}

pub fn action_for_target(target: usize) -> Option<Action> {
    match target {
        0 => Some(Action::Decrement),
        1 => Some(Action::Increment),
        _ => None,
    }
}

/// Inputs to painting besides the tree.
#[derive(Debug, Clone)]
pub struct PaintContext {
    pub theme: Theme,
    /// Button under the pointer.
    pub hovered: Option<Action>,
    /// Button with keyboard focus.
    pub focused: Option<Action>,
    /// Confetti frame while a burst plays.
    pub confetti_frame: Option<u32>,
}

impl PaintContext {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            hovered: None,
            focused: None,
            confetti_frame: None,
        }
    }
}

/// One finished frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    pub buffer: FrameBuffer,
    pub hit_regions: Vec<HitRegion>,
    /// Terminal size at time of render.
    pub terminal_size: (u16, u16),
}

// =============================================================================
// Painting
// =============================================================================

/// Lay out and paint `tree` in a `width` x `height` frame.
///
/// A layout failure is logged and yields a blank frame.
pub fn build_frame(tree: &Node, width: u16, height: u16, ctx: &PaintContext) -> FrameResult {
    let mut buffer = FrameBuffer::new(width, height);
    let hit_regions = match compute_layout(tree, width, height) {
        Ok(rects) => paint(tree, &rects, ctx, &mut buffer),
        Err(err) => {
            tracing::warn!(error = %err, "layout failed, drawing blank frame");
            Vec::new()
        }
    };

    FrameResult {
        buffer,
        hit_regions,
        terminal_size: (width, height),
    }
}

/// Paint `tree` using `rects` (one per node, pre-order).
///
/// Returns hit regions for enabled buttons only.
pub fn paint(tree: &Node, rects: &[Rect], ctx: &PaintContext, buffer: &mut FrameBuffer) -> Vec<HitRegion> {
    let theme = &ctx.theme;
    let primary = theme.primary.resolve();
    let accent = theme.accent.resolve();
    let mut regions = Vec::new();
    let mut confetti_area = None;

    for (node, &rect) in tree.pre_order().into_iter().zip(rects) {
        match node {
            Node::Container { .. } => {
                buffer.fill_rect(rect, accent);
                confetti_area = Some(rect);
            }
            Node::Wrapper { label, .. } => {
                buffer.draw_border(rect, BorderStyle::Rounded, theme.border.resolve(), None);
                buffer.draw_border_title(rect, label, primary, None, Attr::BOLD);
            }
            Node::Value { text, class, treatment } => {
                let fg = theme.value_color(*class, *treatment).resolve();
                buffer.draw_text_centered(rect.x, rect.y, rect.width, text, fg, None, Attr::BOLD);
            }
            Node::Buttons { .. } => {}
            Node::Button { label, action, disabled } => {
                let text = format!("[ {label} ]");
                if *disabled {
                    buffer.draw_text(rect.x, rect.y, &text, theme.disabled.resolve(), None, Attr::DIM);
                    continue;
                }

                let highlighted = ctx.hovered == Some(*action) || ctx.focused == Some(*action);
                let bg = highlighted.then(|| theme.focus.resolve());
                let attrs = if ctx.focused == Some(*action) { Attr::BOLD } else { Attr::NONE };
                buffer.draw_text(rect.x, rect.y, &text, primary, bg, attrs);

                regions.push(HitRegion {
                    rect,
                    action: *action,
                    target: target_id(*action),
                });
            }
            Node::Slot { lines } => {
                let fg = theme.muted.resolve();
                for (i, line) in lines.iter().enumerate() {
                    let Ok(row) = u16::try_from(i) else { break };
                    buffer.draw_text(rect.x, rect.y.saturating_add(row), line, fg, None, Attr::NONE);
                }
            }
        }
    }

    if let (Some(frame), Some(area)) = (ctx.confetti_frame, confetti_area) {
        paint_confetti(buffer, area, frame, &theme.confetti_palette());
    }

    regions
}

/// Overlay one frame of confetti on `area`.
fn paint_confetti(buffer: &mut FrameBuffer, area: Rect, frame: u32, palette: &[Rgba; 4]) {
    for p in particles(frame, area.width, area.height) {
        buffer.set_cell(
            area.x.saturating_add(p.x),
            area.y.saturating_add(p.y),
            p.glyph,
            palette[p.color as usize % palette.len()],
            None,
            Attr::BOLD,
        );
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Element;
    use crate::primitives::counter_app::CounterApp;
    use crate::primitives::CounterProps;
    use crate::theme::{ddd, terminal};

    fn frame_for(app: &CounterApp, ctx: &PaintContext) -> FrameResult {
        build_frame(&app.template(), 60, 20, ctx)
    }

    fn screen_text(buffer: &FrameBuffer) -> String {
        (0..buffer.height()).map(|y| buffer.row_text(y)).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_paints_label_value_and_buttons() {
        let app = CounterApp::new();
        app.set_title("Guests");
        let result = frame_for(&app, &PaintContext::new(ddd()));
        let text = screen_text(&result.buffer);
        assert!(text.contains("Guests"));
        assert!(text.contains("[ - ]"));
        assert!(text.contains("[ + ]"));
        assert!(text.contains('0'));
        assert_eq!(result.terminal_size, (60, 20));
    }

    #[test]
    fn test_hit_regions_skip_disabled_buttons() {
        let app = CounterApp::from_props(CounterProps { count: 25, ..Default::default() }).unwrap();
        let result = frame_for(&app, &PaintContext::new(ddd()));
        let actions: Vec<Action> = result.hit_regions.iter().map(|r| r.action).collect();
        assert_eq!(actions, vec![Action::Decrement]);

        app.set_count(0);
        let result = frame_for(&app, &PaintContext::new(ddd()));
        assert_eq!(result.hit_regions.len(), 2);
        for region in &result.hit_regions {
            assert_eq!(action_for_target(region.target), Some(region.action));
            assert_eq!(region.rect.width, 5);
        }
    }

    #[test]
    fn test_value_color_follows_treatment() {
        let app = CounterApp::from_props(CounterProps { count: 18, ..Default::default() }).unwrap();
        let theme = terminal();
        let result = frame_for(&app, &PaintContext::new(theme.clone()));

        let rects = compute_layout(&app.template(), 60, 20).unwrap();
        let value = rects[2];
        let cell = result
            .buffer
            .get(value.x, value.y)
            .copied()
            .unwrap_or_default();
        assert_eq!(cell.ch, '1');
        assert_eq!(cell.fg, theme.count_18.resolve());
    }

    #[test]
    fn test_focus_highlights_button() {
        let app = CounterApp::new();
        let theme = ddd();
        let mut ctx = PaintContext::new(theme.clone());
        ctx.focused = Some(Action::Increment);
        let result = frame_for(&app, &ctx);

        let plus = result
            .hit_regions
            .iter()
            .find(|r| r.action == Action::Increment)
            .map(|r| r.rect)
            .unwrap();
        let cell = result.buffer.get(plus.x, plus.y).copied().unwrap_or_default();
        assert_eq!(cell.bg, theme.focus.resolve());
    }

    #[test]
    fn test_confetti_overlay_only_while_active() {
        let app = CounterApp::from_props(CounterProps { count: 21, ..Default::default() }).unwrap();
        let plain = frame_for(&app, &PaintContext::new(ddd()));

        let mut ctx = PaintContext::new(ddd());
        ctx.confetti_frame = Some(12);
        let party = frame_for(&app, &ctx);
        assert_ne!(plain.buffer, party.buffer);
        // Confetti never adds hit regions
        assert_eq!(plain.hit_regions, party.hit_regions);
    }

    #[test]
    fn test_huge_title_paints_without_overflow() {
        let app = CounterApp::new();
        app.set_title("x".repeat(70_000));
        let result = build_frame(&app.template(), 80, 24, &PaintContext::new(ddd()));
        assert_eq!(result.terminal_size, (80, 24));
        assert_eq!((result.buffer.width(), result.buffer.height()), (80, 24));
    }

    #[test]
    fn test_template_buttons_match_element() {
        let app = CounterApp::new();
        let tree = Element::template(&app);
        assert_eq!(tree.buttons().len(), 2);
    }
}
