//=========================================================================
// Camera Manipulator
//=========================================================================
//
// Orbit / pan / dolly control over a shared `VisCameraSettings`.
//
// Gestures (middle button held):
// - drag          → orbit around the focus
// - Shift + drag  → pan position and focus together
// - wheel         → dolly toward / away from the focus
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use log::trace;

//=== Internal Dependencies ===============================================

use super::{Handling, IntersectionContext, Manipulator};
use crate::core::input::{InputEvent, InputSnapshot, MouseButton};
use crate::core::vis::VisCameraSettings;

//=== Constants ===========================================================

/// Radians of orbit per pixel of drag.
const ORBIT_SPEED: f32 = 0.01;

/// World units of pan per pixel, per unit of focus distance.
const PAN_SPEED: f32 = 0.0015;

/// Distance factor applied per wheel line.
const DOLLY_FACTOR: f32 = 0.9;

const MAX_PITCH_DEGREES: f32 = 89.0;

//=== CameraManipulator ===================================================

pub struct CameraManipulator {
    camera: Rc<RefCell<VisCameraSettings>>,
}

impl CameraManipulator {
    pub fn new(camera: Rc<RefCell<VisCameraSettings>>) -> Self {
        Self { camera }
    }

    pub fn camera(&self) -> &Rc<RefCell<VisCameraSettings>> {
        &self.camera
    }

    fn orbit(camera: &mut VisCameraSettings, dx: f32, dy: f32) {
        let offset = camera.position - camera.focus;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }

        let max_pitch = MAX_PITCH_DEGREES.to_radians();
        let yaw = offset.x.atan2(offset.z) - dx * ORBIT_SPEED;
        let pitch = ((offset.y / distance).clamp(-1.0, 1.0).asin() + dy * ORBIT_SPEED)
            .clamp(-max_pitch, max_pitch);

        let direction = Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos());
        camera.position = camera.focus + direction * distance;
    }

    fn pan(camera: &mut VisCameraSettings, dx: f32, dy: f32) {
        let forward = (camera.focus - camera.position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);

        let scale = PAN_SPEED * camera.distance();
        let translation = (-right * dx + up * dy) * scale;
        camera.position += translation;
        camera.focus += translation;
    }

    fn dolly(camera: &mut VisCameraSettings, lines: f32) {
        let offset = camera.position - camera.focus;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }

        let target = (distance * DOLLY_FACTOR.powf(lines)).max(camera.near_clip);
        camera.position = camera.focus + offset / distance * target;
    }
}

impl Manipulator for CameraManipulator {
    fn name(&self) -> &str {
        "camera"
    }

    fn on_input_event(
        &mut self,
        snapshot: &InputSnapshot,
        _intersection: &IntersectionContext<'_>,
    ) -> Handling {
        match snapshot.event {
            InputEvent::MouseMoved { .. } if snapshot.is_held(MouseButton::Middle) => {
                let (dx, dy) = snapshot.delta;
                let mut camera = self.camera.borrow_mut();
                if snapshot.modifiers.shift {
                    Self::pan(&mut camera, dx, dy);
                } else {
                    Self::orbit(&mut camera, dx, dy);
                }
                trace!(target: "manipulators", "Camera moved to {:?}", camera.position);
            }
            InputEvent::MouseWheel { .. } => {
                Self::dolly(&mut self.camera.borrow_mut(), snapshot.wheel_delta);
            }
            _ => {}
        }

        // Any button-up that leaves nothing held ends camera control, so a
        // chord released middle-first still lets go.
        let released = matches!(snapshot.event, InputEvent::MouseButtonUp { .. }) && !snapshot.any_held();
        Handling::from(!released)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputTranslator, Modifiers};

    fn shared_camera() -> Rc<RefCell<VisCameraSettings>> {
        Rc::new(RefCell::new(VisCameraSettings {
            position: Vec3::new(0.0, 0.0, 10.0),
            focus: Vec3::ZERO,
            ..Default::default()
        }))
    }

    fn press(button: MouseButton, modifiers: Modifiers) -> InputEvent {
        InputEvent::MouseButtonDown { button, modifiers }
    }

    fn release(button: MouseButton) -> InputEvent {
        InputEvent::MouseButtonUp { button, modifiers: Modifiers::NONE }
    }

    /// Feeds `events` through a translator and the manipulator, returning the last answer.
    fn drive(manipulator: &mut CameraManipulator, events: Vec<InputEvent>) -> Handling {
        let mut translator = InputTranslator::new();
        let mut last = Handling::Continue;
        for event in events {
            let snapshot = translator.translate(event);
            last = manipulator.on_input_event(&snapshot, &IntersectionContext::Unavailable);
        }
        last
    }

    #[test]
    fn orbit_preserves_focus_distance() {
        let camera = shared_camera();
        let mut manipulator = CameraManipulator::new(Rc::clone(&camera));

        drive(
            &mut manipulator,
            vec![
                InputEvent::MouseMoved { x: 100.0, y: 100.0 },
                press(MouseButton::Middle, Modifiers::NONE),
                InputEvent::MouseMoved { x: 160.0, y: 130.0 },
            ],
        );

        let camera = camera.borrow();
        assert!((camera.distance() - 10.0).abs() < 1e-4);
        assert_ne!(camera.position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(camera.focus, Vec3::ZERO);
    }

    #[test]
    fn orbit_pitch_is_clamped() {
        let camera = shared_camera();
        let mut manipulator = CameraManipulator::new(Rc::clone(&camera));

        drive(
            &mut manipulator,
            vec![
                InputEvent::MouseMoved { x: 0.0, y: 0.0 },
                press(MouseButton::Middle, Modifiers::NONE),
                InputEvent::MouseMoved { x: 0.0, y: 10_000.0 },
            ],
        );

        let camera = camera.borrow();
        let pitch = (camera.position.y / camera.distance()).asin();
        assert!(pitch <= MAX_PITCH_DEGREES.to_radians() + 1e-4);
        assert!(!camera.camera_to_world().is_nan());
    }

    #[test]
    fn shift_drag_pans_focus_with_camera() {
        let camera = shared_camera();
        let mut manipulator = CameraManipulator::new(Rc::clone(&camera));

        drive(
            &mut manipulator,
            vec![
                InputEvent::MouseMoved { x: 0.0, y: 0.0 },
                press(MouseButton::Middle, Modifiers::SHIFT),
                InputEvent::MouseMoved { x: 100.0, y: 0.0 },
            ],
        );

        let camera = camera.borrow();
        assert!(camera.focus.x < 0.0);
        assert!((camera.position - camera.focus - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn motion_without_middle_does_nothing() {
        let camera = shared_camera();
        let mut manipulator = CameraManipulator::new(Rc::clone(&camera));

        drive(
            &mut manipulator,
            vec![InputEvent::MouseMoved { x: 0.0, y: 0.0 }, InputEvent::MouseMoved { x: 50.0, y: 50.0 }],
        );

        assert_eq!(camera.borrow().position, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn wheel_dollies_but_not_past_near_clip() {
        let camera = shared_camera();
        let mut manipulator = CameraManipulator::new(Rc::clone(&camera));

        drive(&mut manipulator, vec![InputEvent::MouseWheel { delta: 1.0 }]);
        assert!((camera.borrow().distance() - 9.0).abs() < 1e-4);

        drive(&mut manipulator, vec![InputEvent::MouseWheel { delta: 500.0 }]);
        let near = camera.borrow().near_clip;
        assert!((camera.borrow().distance() - near).abs() < 1e-4);
    }

    #[test]
    fn releases_after_last_button_up() {
        let mut manipulator = CameraManipulator::new(shared_camera());

        let held = drive(
            &mut manipulator,
            vec![
                press(MouseButton::Middle, Modifiers::NONE),
                press(MouseButton::Left, Modifiers::NONE),
                release(MouseButton::Middle),
            ],
        );
        assert_eq!(held, Handling::Continue);

        let done = drive(
            &mut manipulator,
            vec![press(MouseButton::Middle, Modifiers::NONE), release(MouseButton::Middle)],
        );
        assert_eq!(done, Handling::Release);
    }

    #[test]
    fn chord_released_middle_first_lets_go_on_last_button() {
        let mut manipulator = CameraManipulator::new(shared_camera());
        let mut translator = InputTranslator::new();
        let mut feed = |event| {
            let snapshot = translator.translate(event);
            manipulator.on_input_event(&snapshot, &IntersectionContext::Unavailable)
        };

        assert_eq!(feed(press(MouseButton::Middle, Modifiers::NONE)), Handling::Continue);
        assert_eq!(feed(press(MouseButton::Left, Modifiers::NONE)), Handling::Continue);
        assert_eq!(feed(release(MouseButton::Middle)), Handling::Continue);
        assert_eq!(feed(release(MouseButton::Left)), Handling::Release);
    }
}
