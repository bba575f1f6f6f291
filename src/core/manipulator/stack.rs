//=========================================================================
// Manipulator Stack
//=========================================================================
//
// Input listener that feeds a stack of manipulators.
//
// Manipulators are registered once and referenced by id. The active
// stack decides who receives input: only the topmost entry is fed, and
// it leaves the stack when it answers `Handling::Release`.
//
// A middle-button press hands control to the manipulator registered
// under `CAMERA_MANIPULATOR`, which becomes the only active entry.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::{
    Handling, IntersectionContext, IntersectionScene, Manipulator, ManipulatorId,
    ManipulatorState,
};
use crate::core::input::InputSnapshot;
use crate::core::overlay::InputListener;

//=== Constants ===========================================================

/// Reserved id of the camera manipulator.
pub const CAMERA_MANIPULATOR: ManipulatorId = 256;

//=== Entry ===============================================================

struct Entry {
    manipulator: Box<dyn Manipulator>,
    state: ManipulatorState,
}

//=== ManipulatorStack ====================================================

/// Registered manipulators plus the stack of those receiving input.
///
/// Invariants:
/// - every id in the active stack is registered and `Active`
/// - every `Active` entry appears exactly once in the active stack
#[derive(Default)]
pub struct ManipulatorStack {
    registered: BTreeMap<ManipulatorId, Entry>,
    active: Vec<ManipulatorId>,
    intersection_scene: Option<Rc<dyn IntersectionScene>>,
}

impl ManipulatorStack {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Binds `manipulator` to `id`, replacing any previous binding.
    ///
    /// A replacement for an active id takes over its place in the stack.
    pub fn register(&mut self, id: ManipulatorId, manipulator: Box<dyn Manipulator>) {
        match self.registered.get_mut(&id) {
            Some(entry) => {
                debug!(
                    target: "manipulators",
                    "Manipulator {} ('{}') replaced by '{}'",
                    id,
                    entry.manipulator.name(),
                    manipulator.name()
                );
                let active = entry.state == ManipulatorState::Active;
                if active {
                    entry.manipulator.on_deactivate();
                }
                entry.manipulator = manipulator;
                if active {
                    entry.manipulator.on_activate();
                }
            }
            None => {
                debug!(target: "manipulators", "Manipulator {} ('{}') registered", id, manipulator.name());
                self.registered.insert(
                    id,
                    Entry { manipulator, state: ManipulatorState::Inactive },
                );
            }
        }
    }

    /// Supplies the scene used for hit tests during dispatch.
    pub fn set_intersection_scene(&mut self, scene: Option<Rc<dyn IntersectionScene>>) {
        self.intersection_scene = scene;
    }

    //--- Activation -------------------------------------------------------

    /// Moves `id` to the top of the active stack.
    ///
    /// Returns `false` if nothing is registered under `id`.
    pub fn activate(&mut self, id: ManipulatorId) -> bool {
        let Some(entry) = self.registered.get_mut(&id) else {
            warn!(target: "manipulators", "Attempted to activate unregistered manipulator {}", id);
            return false;
        };

        if let Some(pos) = self.active.iter().position(|&a| a == id) {
            self.active.remove(pos);
        } else {
            entry.state = ManipulatorState::Active;
            entry.manipulator.on_activate();
        }

        self.active.push(id);
        trace!(target: "manipulators", "Active stack: {:?}", self.active);
        true
    }

    /// Removes `id` from the active stack. Returns `false` if it was not active.
    pub fn deactivate(&mut self, id: ManipulatorId) -> bool {
        let Some(pos) = self.active.iter().position(|&a| a == id) else {
            return false;
        };
        self.active.remove(pos);

        if let Some(entry) = self.registered.get_mut(&id) {
            entry.state = ManipulatorState::Inactive;
            entry.manipulator.on_deactivate();
        }
        trace!(target: "manipulators", "Active stack: {:?}", self.active);
        true
    }

    /// Makes `id` the only active manipulator.
    fn activate_exclusive(&mut self, id: ManipulatorId) {
        let others: Vec<ManipulatorId> = self.active.iter().copied().filter(|&a| a != id).collect();
        for other in others {
            self.deactivate(other);
        }
        self.activate(id);
    }

    //--- Queries ----------------------------------------------------------

    pub fn get(&self, id: ManipulatorId) -> Option<&dyn Manipulator> {
        self.registered.get(&id).map(|e| e.manipulator.as_ref())
    }

    pub fn state(&self, id: ManipulatorId) -> Option<ManipulatorState> {
        self.registered.get(&id).map(|e| e.state)
    }

    /// Active ids, bottom first.
    pub fn active_ids(&self) -> &[ManipulatorId] {
        &self.active
    }

    /// The manipulator currently receiving input.
    pub fn top(&self) -> Option<ManipulatorId> {
        self.active.last().copied()
    }

    /// Number of registered manipulators.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

//=== Input Dispatch ======================================================

impl InputListener for ManipulatorStack {
    /// Feeds the snapshot to the top active manipulator.
    ///
    /// Never consumes the event, so later listeners still see it.
    fn on_input_event(&mut self, snapshot: &InputSnapshot) -> bool {
        if snapshot.is_press_middle() && self.registered.contains_key(&CAMERA_MANIPULATOR) {
            self.activate_exclusive(CAMERA_MANIPULATOR);
        }

        let Some(top) = self.top() else {
            return false;
        };

        let handling = {
            let intersection = match &self.intersection_scene {
                Some(scene) => IntersectionContext::Scene(scene.as_ref()),
                None => IntersectionContext::Unavailable,
            };
            match self.registered.get_mut(&top) {
                Some(entry) => entry.manipulator.on_input_event(snapshot, &intersection),
                None => Handling::Release,
            }
        };

        if handling == Handling::Release {
            debug!(target: "manipulators", "Manipulator {} released input", top);
            self.deactivate(top);
        }

        false
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
