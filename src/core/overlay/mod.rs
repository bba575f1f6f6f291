//=========================================================================
// Overlay Systems
//=========================================================================
//
// Pluggable units that draw into the scene and/or on top of it, and may
// supply an input listener.
//
// Architecture:
//   OverlaySystemSet (main overlay of a FrameRig)
//     ├─ ModelVisLayer          (scene)
//     ├─ VisualisationOverlay   (scene + widgets)
//     └─ InputLayer             (input only)
//           └─ ManipulatorStack
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::input::InputSnapshot;
use crate::core::render::{LightingParserContext, ProjectionDesc, ThreadContext};

//=== Module Declarations =================================================

mod input_layer;
mod overlay_set;

//=== Public API ==========================================================

pub use input_layer::InputLayer;
pub use overlay_set::OverlaySystemSet;

//=== InputListener =======================================================

/// Receives input snapshots routed by an overlay system.
pub trait InputListener {
    /// Handles one snapshot. Returns `true` if the event was consumed and
    /// must not be offered to later listeners.
    fn on_input_event(&mut self, snapshot: &InputSnapshot) -> bool;
}

/// Input listener shared between an overlay system and its owner.
pub type SharedInputListener = Rc<RefCell<dyn InputListener>>;

//=== OverlaySystem =======================================================

/// A unit that can render into the scene, draw widgets and listen to input.
///
/// Only the two render hooks are required; systems without input return
/// `None` from [`input_listener`](Self::input_listener).
pub trait OverlaySystem {
    fn input_listener(&self) -> Option<SharedInputListener> {
        None
    }

    /// Contributes scene content for the current frame.
    fn render_to_scene(&mut self, thread: &mut dyn ThreadContext, parser: &mut LightingParserContext);

    /// Draws 2D widgets on top of the scene.
    fn render_widgets(&mut self, thread: &mut dyn ThreadContext, projection: &ProjectionDesc);

    /// Notifies the system that it became (in)active.
    fn set_activation_state(&mut self, active: bool) {
        let _ = active;
    }
}
