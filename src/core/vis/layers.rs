//=========================================================================
// Model Visualisation Layers
//=========================================================================
//
// Overlay systems that make up the model viewer:
// - `ModelVisLayer` draws the model through the shared cache
// - `VisualisationOverlay` adds debug overlays and the info label
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use glam::Vec2;
use log::warn;

//=== Internal Dependencies ===============================================

use super::{ModelLookup, ModelVisCache, ModelVisSettings};
use crate::core::overlay::OverlaySystem;
use crate::core::render::{
    Colour, DrawCommand, FontDesc, LightingParserContext, PendingResource, ProjectionDesc,
    ResourceKind, ThreadContext,
};

//=== ModelVisLayer =======================================================

/// Draws the configured model from the camera in the settings.
pub struct ModelVisLayer {
    settings: Rc<ModelVisSettings>,
    cache: Rc<ModelVisCache>,
    reported_failure: bool,
}

impl ModelVisLayer {
    pub fn new(settings: Rc<ModelVisSettings>, cache: Rc<ModelVisCache>) -> Self {
        Self { settings, cache, reported_failure: false }
    }
}

impl OverlaySystem for ModelVisLayer {
    fn render_to_scene(&mut self, thread: &mut dyn ThreadContext, parser: &mut LightingParserContext) {
        let metal = thread.metal_context();
        let projection = self
            .settings
            .camera
            .borrow()
            .projection_desc(metal.viewport().aspect());
        parser.set_projection_desc(projection);

        let name = &self.settings.model_name;
        match self.cache.lookup(name) {
            ModelLookup::Ready(model) => {
                metal.submit(DrawCommand::Model {
                    name: model.name.clone(),
                    level_of_detail: self.settings.level_of_detail.min(model.lod_count.saturating_sub(1)),
                    world_to_projection: projection.world_to_projection,
                });
                parser.resolve_lighting(metal);
            }
            ModelLookup::Pending => {
                parser.add_pending(PendingResource::new(name.clone(), ResourceKind::Model));
            }
            ModelLookup::Failed(reason) => {
                if !self.reported_failure {
                    warn!(target: "vis", "Not drawing '{}': {}", name, reason);
                    self.reported_failure = true;
                }
            }
        }
    }

    fn render_widgets(&mut self, _thread: &mut dyn ThreadContext, _projection: &ProjectionDesc) {}
}

//=== VisualisationOverlay ================================================

const INFO_COLOUR: Colour = [0.9, 0.9, 0.9, 1.0];
const INFO_MARGIN: f32 = 12.0;

/// Debug overlays (wireframe, normals) and the model/camera info label.
///
/// Debug overlays are drawn only once the model is loaded; the info label
/// is always shown when enabled.
pub struct VisualisationOverlay {
    settings: Rc<ModelVisSettings>,
    cache: Rc<ModelVisCache>,
    font: FontDesc,
}

impl VisualisationOverlay {
    pub fn new(settings: Rc<ModelVisSettings>, cache: Rc<ModelVisCache>) -> Self {
        Self { settings, cache, font: FontDesc::default() }
    }

    pub fn with_font(mut self, font: FontDesc) -> Self {
        self.font = font;
        self
    }

    fn info_lines(&self, projection: &ProjectionDesc) -> Vec<String> {
        let mut model = format!("Model: {}", self.settings.model_name);
        if let Some(material) = &self.settings.material_name {
            model.push_str(&format!(" [{}]", material));
        }
        let p = projection.camera_position();
        vec![model, format!("Camera: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z)]
    }
}

impl OverlaySystem for VisualisationOverlay {
    fn render_to_scene(&mut self, thread: &mut dyn ThreadContext, _parser: &mut LightingParserContext) {
        if !self.settings.draw_wireframe && !self.settings.draw_normals {
            return;
        }
        let Some(model) = self.cache.ready(&self.settings.model_name) else {
            return;
        };

        let metal = thread.metal_context();
        if self.settings.draw_wireframe {
            metal.submit(DrawCommand::Wireframe { name: model.name.clone() });
        }
        if self.settings.draw_normals {
            metal.submit(DrawCommand::Normals { name: model.name.clone() });
        }
    }

    fn render_widgets(&mut self, thread: &mut dyn ThreadContext, projection: &ProjectionDesc) {
        if !self.settings.show_info {
            return;
        }

        let metal = thread.metal_context();
        let lines = self.info_lines(projection);
        let line_height = self.font.size as f32 * 1.25;
        let bottom = metal.viewport().height as f32 - INFO_MARGIN;
        let top = bottom - lines.len() as f32 * line_height;

        for (row, text) in lines.into_iter().enumerate() {
            metal.submit(DrawCommand::Text {
                font: self.font.clone(),
                position: Vec2::new(INFO_MARGIN, top + row as f32 * line_height),
                colour: INFO_COLOUR,
                text,
            });
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    use crate::core::render::{GlobalTechniqueContext, RecordingContext, StandardLightingPlugin};
    use crate::core::vis::{ModelEvent, ModelLoaderLink, ModelScaffold};

    fn parser() -> LightingParserContext {
        let mut parser = LightingParserContext::new(Rc::new(GlobalTechniqueContext::new()));
        parser.add_plugin(Rc::new(StandardLightingPlugin::default()));
        parser
    }

    #[test]
    fn pending_model_registers_pending_resource() {
        let (cache, _link) = ModelVisCache::new(4);
        let settings = Rc::new(ModelVisSettings::new("rock"));
        let mut layer = ModelVisLayer::new(settings, Rc::new(cache));

        let mut thread = RecordingContext::default();
        let mut parser = parser();
        layer.render_to_scene(&mut thread, &mut parser);

        assert_eq!(parser.pending_resources(), &[PendingResource::new("rock", ResourceKind::Model)]);
        assert!(thread.commands().is_empty());
    }

    #[test]
    fn ready_model_is_drawn_and_lit() {
        let (cache, link) = ModelVisCache::new(4);
        let cache = Rc::new(cache);
        let settings = Rc::new(ModelVisSettings::new("rock"));
        let mut layer = ModelVisLayer::new(settings, Rc::clone(&cache));

        cache.lookup("rock");
        link.events
            .send(ModelEvent::Loaded(ModelScaffold::new("rock", Vec3::NEG_ONE, Vec3::ONE)))
            .unwrap();

        let mut thread = RecordingContext::default();
        let mut parser = parser();
        layer.render_to_scene(&mut thread, &mut parser);

        assert!(!parser.has_pending_resources());
        assert!(matches!(&thread.commands()[0], DrawCommand::Model { name, level_of_detail: 0, .. } if name == "rock"));
        assert!(matches!(thread.commands()[1], DrawCommand::LightingResolve { .. }));
    }

    #[test]
    fn layer_sets_projection_from_camera() {
        let (cache, _link) = ModelVisCache::new(4);
        let settings = Rc::new(ModelVisSettings::new("rock"));
        let expected = settings.camera.borrow().position;
        let mut layer = ModelVisLayer::new(settings, Rc::new(cache));

        let mut thread = RecordingContext::default();
        let mut parser = parser();
        layer.render_to_scene(&mut thread, &mut parser);

        assert!(parser.projection_desc().camera_position().distance(expected) < 1e-4);
    }

    fn debug_settings() -> Rc<ModelVisSettings> {
        let mut settings = ModelVisSettings::new("rock");
        settings.draw_wireframe = true;
        settings.draw_normals = true;
        Rc::new(settings)
    }

    fn empty_cache() -> (Rc<ModelVisCache>, ModelLoaderLink) {
        let (cache, link) = ModelVisCache::new(4);
        (Rc::new(cache), link)
    }

    #[test]
    fn overlay_skips_debug_views_until_model_is_ready() {
        let (cache, _link) = empty_cache();
        cache.lookup("rock");
        let mut overlay = VisualisationOverlay::new(debug_settings(), cache);

        let mut thread = RecordingContext::default();
        overlay.render_to_scene(&mut thread, &mut parser());
        assert!(thread.commands().is_empty());
    }

    #[test]
    fn overlay_skips_debug_views_for_failed_model() {
        let (cache, link) = empty_cache();
        cache.lookup("rock");
        link.events
            .send(ModelEvent::Failed { name: "rock".into(), reason: "corrupt".into() })
            .unwrap();
        let mut overlay = VisualisationOverlay::new(debug_settings(), cache);

        let mut thread = RecordingContext::default();
        overlay.render_to_scene(&mut thread, &mut parser());
        assert!(thread.commands().is_empty());
    }

    #[test]
    fn overlay_draws_enabled_debug_views() {
        let (cache, link) = empty_cache();
        cache.lookup("rock");
        link.events
            .send(ModelEvent::Loaded(ModelScaffold::new("rock", Vec3::NEG_ONE, Vec3::ONE)))
            .unwrap();
        let mut overlay = VisualisationOverlay::new(debug_settings(), cache);

        let mut thread = RecordingContext::default();
        overlay.render_to_scene(&mut thread, &mut parser());

        assert_eq!(
            thread.commands(),
            &[
                DrawCommand::Wireframe { name: "rock".into() },
                DrawCommand::Normals { name: "rock".into() },
            ]
        );
    }

    #[test]
    fn info_label_shows_model_and_camera() {
        let mut settings = ModelVisSettings::new("rock");
        settings.material_name = Some("granite".into());
        let (cache, _link) = empty_cache();
        let mut overlay = VisualisationOverlay::new(Rc::new(settings), cache);

        let projection = ProjectionDesc {
            camera_to_world: glam::Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            ..ProjectionDesc::default()
        };
        let mut thread = RecordingContext::default();
        overlay.render_widgets(&mut thread, &projection);

        assert_eq!(thread.texts(), vec!["Model: rock [granite]", "Camera: (1.00, 2.00, 3.00)"]);
    }

    #[test]
    fn info_label_can_be_hidden() {
        let mut settings = ModelVisSettings::new("rock");
        settings.show_info = false;
        let (cache, _link) = empty_cache();
        let mut overlay = VisualisationOverlay::new(Rc::new(settings), cache);

        let mut thread = RecordingContext::default();
        overlay.render_widgets(&mut thread, &ProjectionDesc::default());
        assert!(thread.commands().is_empty());
    }
}
