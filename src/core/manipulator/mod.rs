//=========================================================================
// Manipulators
//=========================================================================
//
// Interactive tools (camera orbit, gizmos, selection) that consume input
// while active and decide for themselves when to let go.
//
// Architecture:
//   ManipulatorStack
//     ├─ registered: BTreeMap<ManipulatorId, Entry { manipulator, state }>
//     └─ active: Vec<ManipulatorId>   (top = last)
//
// Flow:
//   on_input_event() → top manipulator → Handling::Release → Inactive
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use crate::core::input::InputSnapshot;

//=== Module Declarations =================================================

mod camera;
mod stack;

//=== Public API ==========================================================

pub use camera::CameraManipulator;
pub use stack::{ManipulatorStack, CAMERA_MANIPULATOR};

/// Identifier a manipulator is registered under.
pub type ManipulatorId = u64;

//=== Handling ============================================================

/// What a manipulator wants after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handling {
    /// Keep receiving events.
    Continue,

    /// Done; leave the active stack.
    Release,
}

impl From<bool> for Handling {
    /// `true` means "continue handling".
    fn from(keep: bool) -> Self {
        if keep {
            Self::Continue
        } else {
            Self::Release
        }
    }
}

//=== ManipulatorState ====================================================

/// Activation state of a registered manipulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulatorState {
    Active,
    Inactive,
}

//=== Intersection ========================================================

/// Ray queries against the scene under the cursor.
pub trait IntersectionScene {
    /// First hit along the ray, in world space.
    fn first_ray_intersection(&self, origin: Vec3, direction: Vec3) -> Option<Vec3>;
}

/// Scene access given to manipulators alongside each event.
#[derive(Clone, Copy)]
pub enum IntersectionContext<'a> {
    /// No scene is attached; manipulators must not rely on hit tests.
    Unavailable,

    Scene(&'a dyn IntersectionScene),
}

impl<'a> IntersectionContext<'a> {
    pub fn scene(&self) -> Option<&'a dyn IntersectionScene> {
        match self {
            Self::Unavailable => None,
            Self::Scene(scene) => Some(*scene),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Scene(_))
    }
}

//=== Manipulator Trait ===================================================

/// An interactive tool driven by input snapshots.
///
/// Only `name` and `on_input_event` are required; activation hooks
/// default to no-ops.
pub trait Manipulator {
    fn name(&self) -> &str;

    /// Handles one event while this manipulator is the top active entry.
    fn on_input_event(
        &mut self,
        snapshot: &InputSnapshot,
        intersection: &IntersectionContext<'_>,
    ) -> Handling;

    /// Called when the manipulator enters the active stack.
    fn on_activate(&mut self) {}

    /// Called when the manipulator leaves the active stack.
    fn on_deactivate(&mut self) {}
}

//=========================================================================
// Unit Tests
//=========================================================================
