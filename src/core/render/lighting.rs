//=========================================================================
// Lighting Parser Context
//=========================================================================
//
// Per-frame state shared by everything that contributes to the scene.
//
// Architecture:
//   GlobalTechniqueContext (shared, long-lived)
//        ↓ scoped by
//   LightingParserContext (one per frame)
//     ├─ plugins: lighting resolve hooks
//     ├─ pending: resources requested but not ready
//     └─ projection: camera used for this frame
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use log::trace;

//=== Internal Dependencies ===============================================

use super::{DrawCommand, MetalContext};

//=== GlobalTechniqueContext ==============================================

/// Shared configuration describing how rendering passes are parameterised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalTechniqueContext {
    shader_defines: BTreeMap<String, String>,
}

impl GlobalTechniqueContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a global shader define.
    pub fn with_define(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.shader_defines.insert(name.into(), value.into());
        self
    }

    pub fn define(&self, name: &str) -> Option<&str> {
        self.shader_defines.get(name).map(String::as_str)
    }

    pub fn defines(&self) -> impl Iterator<Item = (&str, &str)> {
        self.shader_defines.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

//=== ProjectionDesc ======================================================

/// Camera description for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionDesc {
    pub world_to_projection: Mat4,
    pub camera_to_world: Mat4,
    /// Vertical field of view in radians.
    pub vertical_fov: f32,
    pub aspect: f32,
    pub near_clip: f32,
    pub far_clip: f32,
}

impl ProjectionDesc {
    /// Right-handed perspective projection for a camera placed by `camera_to_world`.
    pub fn perspective(
        camera_to_world: Mat4,
        vertical_fov: f32,
        aspect: f32,
        near_clip: f32,
        far_clip: f32,
    ) -> Self {
        let projection = Mat4::perspective_rh(vertical_fov, aspect, near_clip, far_clip);
        Self {
            world_to_projection: projection * camera_to_world.inverse(),
            camera_to_world,
            vertical_fov,
            aspect,
            near_clip,
            far_clip,
        }
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_to_world.w_axis.truncate()
    }
}

impl Default for ProjectionDesc {
    fn default() -> Self {
        Self {
            world_to_projection: Mat4::IDENTITY,
            camera_to_world: Mat4::IDENTITY,
            vertical_fov: 40f32.to_radians(),
            aspect: 1.0,
            near_clip: 0.1,
            far_clip: 1000.0,
        }
    }
}

//=== Pending Resources ===================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Model,
    Material,
    Texture,
    Shader,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Model => "model",
            Self::Material => "material",
            Self::Texture => "texture",
            Self::Shader => "shader",
        };
        f.write_str(label)
    }
}

/// A resource requested by a render pass that is not loaded yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingResource {
    pub name: String,
    pub kind: ResourceKind,
}

impl PendingResource {
    pub fn new(name: impl Into<String>, kind: ResourceKind) -> Self {
        Self { name: name.into(), kind }
    }
}

//=== LightingPlugin ======================================================

/// Hook invoked when the scene's lighting is resolved.
pub trait LightingPlugin {
    fn name(&self) -> &str;

    fn on_lighting_resolve(&self, metal: &mut dyn MetalContext, parser: &LightingParserContext);
}

/// Default plugin: ambient term plus a single directional sun.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardLightingPlugin {
    pub ambient: Vec3,
    pub sun_direction: Vec3,
}

impl Default for StandardLightingPlugin {
    fn default() -> Self {
        Self {
            ambient: Vec3::new(0.15, 0.15, 0.18),
            sun_direction: Vec3::new(-0.4, -1.0, -0.3).normalize(),
        }
    }
}

impl LightingPlugin for StandardLightingPlugin {
    fn name(&self) -> &str {
        "standard"
    }

    fn on_lighting_resolve(&self, metal: &mut dyn MetalContext, _parser: &LightingParserContext) {
        metal.submit(DrawCommand::LightingResolve {
            ambient: self.ambient,
            sun_direction: self.sun_direction,
        });
    }
}

//=== LightingParserContext ===============================================

/// Per-frame scene context scoped to a shared technique context.
pub struct LightingParserContext {
    technique: Rc<GlobalTechniqueContext>,
    plugins: Vec<Rc<dyn LightingPlugin>>,
    pending: Vec<PendingResource>,
    projection: ProjectionDesc,
}

impl LightingParserContext {
    pub fn new(technique: Rc<GlobalTechniqueContext>) -> Self {
        Self {
            technique,
            plugins: Vec::new(),
            pending: Vec::new(),
            projection: ProjectionDesc::default(),
        }
    }

    pub fn technique(&self) -> &GlobalTechniqueContext {
        &self.technique
    }

    //--- Plugins ----------------------------------------------------------

    pub fn add_plugin(&mut self, plugin: Rc<dyn LightingPlugin>) {
        self.plugins.push(plugin);
    }

    pub fn plugins(&self) -> &[Rc<dyn LightingPlugin>] {
        &self.plugins
    }

    /// Runs every plugin's lighting resolve in registration order.
    pub fn resolve_lighting(&self, metal: &mut dyn MetalContext) {
        for plugin in &self.plugins {
            trace!(target: "frame", "Resolving lighting with plugin '{}'", plugin.name());
            plugin.on_lighting_resolve(metal, self);
        }
    }

    //--- Pending Resources ------------------------------------------------

    /// Records a pending resource; repeated names are kept once.
    pub fn add_pending(&mut self, resource: PendingResource) {
        if !self.pending.iter().any(|r| r.name == resource.name) {
            self.pending.push(resource);
        }
    }

    pub fn has_pending_resources(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_resources(&self) -> &[PendingResource] {
        &self.pending
    }

    //--- Projection -------------------------------------------------------

    pub fn projection_desc(&self) -> &ProjectionDesc {
        &self.projection
    }

    pub fn set_projection_desc(&mut self, projection: ProjectionDesc) {
        self.projection = projection;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::RecordingContext;

    fn parser() -> LightingParserContext {
        LightingParserContext::new(Rc::new(GlobalTechniqueContext::new()))
    }

    #[test]
    fn pending_resources_are_deduplicated_by_name() {
        let mut ctx = parser();
        assert!(!ctx.has_pending_resources());

        ctx.add_pending(PendingResource::new("rock", ResourceKind::Model));
        ctx.add_pending(PendingResource::new("rock", ResourceKind::Model));
        ctx.add_pending(PendingResource::new("moss", ResourceKind::Texture));

        assert!(ctx.has_pending_resources());
        assert_eq!(ctx.pending_resources().len(), 2);
    }

    #[test]
    fn resolve_lighting_runs_plugins_in_order() {
        let mut ctx = parser();
        ctx.add_plugin(Rc::new(StandardLightingPlugin::default()));
        ctx.add_plugin(Rc::new(StandardLightingPlugin {
            ambient: Vec3::ONE,
            sun_direction: Vec3::NEG_Y,
        }));

        let mut recording = RecordingContext::default();
        ctx.resolve_lighting(&mut recording);

        assert_eq!(recording.commands().len(), 2);
        assert_eq!(
            recording.commands()[1],
            DrawCommand::LightingResolve { ambient: Vec3::ONE, sun_direction: Vec3::NEG_Y }
        );
    }

    #[test]
    fn technique_defines_are_shared() {
        let technique = Rc::new(GlobalTechniqueContext::new().with_define("SKY", "1"));
        let ctx = LightingParserContext::new(Rc::clone(&technique));
        assert_eq!(ctx.technique().define("SKY"), Some("1"));
        assert_eq!(Rc::strong_count(&technique), 2);
    }

    #[test]
    fn perspective_places_camera() {
        let camera_to_world = Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0));
        let desc = ProjectionDesc::perspective(camera_to_world, 1.0, 1.5, 0.1, 100.0);
        assert_eq!(desc.camera_position(), Vec3::new(0.0, 0.0, 5.0));

        // The origin sits straight ahead of the camera: centre of clip space.
        let clip = desc.world_to_projection * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
