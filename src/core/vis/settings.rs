//=========================================================================
// Model Visualisation Settings
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::render::ProjectionDesc;

//=== VisCameraSettings ===================================================

/// Orbit camera used by the model viewer. World up is +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisCameraSettings {
    pub position: Vec3,
    pub focus: Vec3,
    /// Vertical field of view in radians.
    pub vertical_fov: f32,
    pub near_clip: f32,
    pub far_clip: f32,
}

impl Default for VisCameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 10.0),
            focus: Vec3::ZERO,
            vertical_fov: 40f32.to_radians(),
            near_clip: 0.1,
            far_clip: 1000.0,
        }
    }
}

impl VisCameraSettings {
    pub fn distance(&self) -> f32 {
        self.position.distance(self.focus)
    }

    /// Camera transform looking from `position` at `focus`.
    ///
    /// Falls back to a plain translation when the two coincide.
    pub fn camera_to_world(&self) -> Mat4 {
        let forward = self.focus - self.position;
        if forward.length_squared() <= f32::EPSILON || forward.normalize().cross(Vec3::Y).length_squared() <= f32::EPSILON {
            return Mat4::from_translation(self.position);
        }
        Mat4::look_at_rh(self.position, self.focus, Vec3::Y).inverse()
    }

    pub fn projection_desc(&self, aspect: f32) -> ProjectionDesc {
        ProjectionDesc::perspective(
            self.camera_to_world(),
            self.vertical_fov,
            aspect,
            self.near_clip,
            self.far_clip,
        )
    }
}

//=== ModelVisSettings ====================================================

/// What the model viewer shows and how.
///
/// The camera is shared: the camera manipulator moves it and the
/// visualisation layers read it every frame.
#[derive(Debug, Clone)]
pub struct ModelVisSettings {
    pub model_name: String,
    pub material_name: Option<String>,
    pub level_of_detail: u32,
    pub draw_wireframe: bool,
    pub draw_normals: bool,
    pub show_info: bool,
    pub camera: Rc<RefCell<VisCameraSettings>>,
}

impl ModelVisSettings {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            material_name: None,
            level_of_detail: 0,
            draw_wireframe: false,
            draw_normals: false,
            show_info: true,
            camera: Rc::new(RefCell::new(VisCameraSettings::default())),
        }
    }

    pub fn with_camera(mut self, camera: VisCameraSettings) -> Self {
        self.camera = Rc::new(RefCell::new(camera));
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_to_world_positions_camera() {
        let camera = VisCameraSettings::default();
        let world = camera.camera_to_world();
        assert!(world.w_axis.truncate().distance(camera.position) < 1e-4);
    }

    #[test]
    fn degenerate_camera_does_not_produce_nan() {
        let camera = VisCameraSettings {
            position: Vec3::ONE,
            focus: Vec3::ONE,
            ..Default::default()
        };
        assert!(!camera.camera_to_world().is_nan());

        let straight_down = VisCameraSettings {
            position: Vec3::new(0.0, 5.0, 0.0),
            focus: Vec3::ZERO,
            ..Default::default()
        };
        assert!(!straight_down.camera_to_world().is_nan());
    }

    #[test]
    fn settings_share_camera_between_clones() {
        let settings = ModelVisSettings::new("teapot");
        let clone = settings.clone();
        clone.camera.borrow_mut().position = Vec3::X;
        assert_eq!(settings.camera.borrow().position, Vec3::X);
    }
}
