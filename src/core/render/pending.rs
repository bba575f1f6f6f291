//=========================================================================
// Pending Resource Placeholder
//=========================================================================
//
// Draws a small panel listing resources that are still loading, so the
// viewport never silently shows an empty scene.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::{Colour, DrawCommand, FontDesc, LightingParserContext, MetalContext};

//=== Layout ==============================================================

const PANEL_ORIGIN: Vec2 = Vec2::new(16.0, 16.0);
const PANEL_PADDING: f32 = 8.0;
const PANEL_COLOUR: Colour = [0.0, 0.0, 0.0, 0.6];
const TEXT_COLOUR: Colour = [1.0, 0.85, 0.3, 1.0];

/// Rough advance per glyph relative to the font size.
const GLYPH_ADVANCE: f32 = 0.55;

//=== draw_pending_resources() ============================================

/// Draws the pending-resource panel for `parser`.
///
/// Lists at most `max_listed` names; the rest are summarised in a
/// trailing line. Does nothing when nothing is pending.
pub fn draw_pending_resources(
    metal: &mut dyn MetalContext,
    parser: &LightingParserContext,
    font: &FontDesc,
    max_listed: usize,
) {
    let pending = parser.pending_resources();
    if pending.is_empty() {
        return;
    }

    let mut lines = Vec::with_capacity(pending.len().min(max_listed) + 2);
    lines.push(match pending.len() {
        1 => "Loading 1 resource".to_string(),
        n => format!("Loading {} resources", n),
    });
    lines.extend(
        pending
            .iter()
            .take(max_listed)
            .map(|r| format!("{}: {}", r.kind, r.name)),
    );
    if pending.len() > max_listed {
        lines.push(format!("... and {} more", pending.len() - max_listed));
    }

    let line_height = font.size as f32 * 1.25;
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let size = Vec2::new(
        widest as f32 * font.size as f32 * GLYPH_ADVANCE,
        lines.len() as f32 * line_height,
    );

    metal.submit(DrawCommand::Rect {
        min: PANEL_ORIGIN,
        max: PANEL_ORIGIN + size + Vec2::splat(PANEL_PADDING * 2.0),
        colour: PANEL_COLOUR,
    });

    for (row, text) in lines.into_iter().enumerate() {
        metal.submit(DrawCommand::Text {
            font: font.clone(),
            position: PANEL_ORIGIN + Vec2::new(PANEL_PADDING, PANEL_PADDING + row as f32 * line_height),
            colour: TEXT_COLOUR,
            text,
        });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::core::render::{GlobalTechniqueContext, PendingResource, RecordingContext, ResourceKind};

    fn parser_with(names: &[&str]) -> LightingParserContext {
        let mut parser = LightingParserContext::new(Rc::new(GlobalTechniqueContext::new()));
        for name in names {
            parser.add_pending(PendingResource::new(*name, ResourceKind::Model));
        }
        parser
    }

    #[test]
    fn nothing_pending_draws_nothing() {
        let mut ctx = RecordingContext::default();
        draw_pending_resources(&mut ctx, &parser_with(&[]), &FontDesc::default(), 4);
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn lists_pending_names_with_font() {
        let mut ctx = RecordingContext::default();
        let font = FontDesc::new("Raleway", 16);
        draw_pending_resources(&mut ctx, &parser_with(&["rock"]), &font, 4);

        assert!(matches!(ctx.commands()[0], DrawCommand::Rect { .. }));
        assert_eq!(ctx.texts(), vec!["Loading 1 resource", "model: rock"]);
        assert!(ctx.commands().iter().all(|c| match c {
            DrawCommand::Text { font: f, .. } => *f == font,
            _ => true,
        }));
    }

    #[test]
    fn overflow_is_summarised() {
        let mut ctx = RecordingContext::default();
        draw_pending_resources(&mut ctx, &parser_with(&["a", "b", "c"]), &FontDesc::default(), 1);
        assert_eq!(ctx.texts(), vec!["Loading 3 resources", "model: a", "... and 2 more"]);
    }
}
