//=========================================================================
// Input Snapshot
//=========================================================================
//
// Per-event view of the input state handed to listeners.
//
// Architecture:
//   InputEvent → InputTranslator::translate() → InputSnapshot
//
// The translator keeps the persistent state (buttons held, cursor,
// modifiers); every snapshot carries that state plus the edge produced
// by the event that triggered it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, Modifiers, MouseButton};

//=== InputSnapshot =======================================================

/// Input state at the moment one event was processed.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    /// The event that produced this snapshot.
    pub event: InputEvent,

    /// Cursor position in window pixels (top-left origin).
    pub position: (f32, f32),

    /// Cursor movement caused by this event (zero for non-motion events).
    pub delta: (f32, f32),

    /// Wheel movement caused by this event, in lines.
    pub wheel_delta: f32,

    /// Modifier state after the event.
    pub modifiers: Modifiers,

    buttons_down: BTreeSet<MouseButton>,
}

impl InputSnapshot {
    /// Snapshot of a single event with no prior state.
    pub fn from_event(event: InputEvent) -> Self {
        InputTranslator::new().translate(event)
    }

    /// Returns `true` if this snapshot's event pressed `button`.
    pub fn is_press(&self, button: MouseButton) -> bool {
        self.event.is_press(button)
    }

    /// Returns `true` if this snapshot's event released `button`.
    pub fn is_release(&self, button: MouseButton) -> bool {
        self.event.is_release(button)
    }

    /// Shorthand for a middle-button press, the camera activation gesture.
    pub fn is_press_middle(&self) -> bool {
        self.is_press(MouseButton::Middle)
    }

    /// Returns `true` while `button` is held (including the press itself).
    pub fn is_held(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Returns `true` if any mouse button is held.
    pub fn any_held(&self) -> bool {
        !self.buttons_down.is_empty()
    }
}

//=== InputTranslator =====================================================

/// Folds a stream of [`InputEvent`]s into [`InputSnapshot`]s.
#[derive(Debug, Default)]
pub struct InputTranslator {
    buttons_down: BTreeSet<MouseButton>,
    position: Option<(f32, f32)>,
    modifiers: Modifiers,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates state with `event` and returns the resulting snapshot.
    ///
    /// The first `MouseMoved` only establishes the cursor position and
    /// reports a zero delta.
    pub fn translate(&mut self, event: InputEvent) -> InputSnapshot {
        let mut delta = (0.0, 0.0);
        let mut wheel_delta = 0.0;

        if let Some(modifiers) = event.modifiers() {
            self.modifiers = modifiers;
        }

        match &event {
            InputEvent::MouseButtonDown { button, .. } => {
                self.buttons_down.insert(*button);
            }
            InputEvent::MouseButtonUp { button, .. } => {
                self.buttons_down.remove(button);
            }
            InputEvent::MouseMoved { x, y } => {
                if let Some((px, py)) = self.position {
                    delta = (x - px, y - py);
                }
                self.position = Some((*x, *y));
            }
            InputEvent::MouseWheel { delta: lines } => {
                wheel_delta = *lines;
            }
            InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. } | InputEvent::Unidentified => {}
        }

        InputSnapshot {
            event,
            position: self.position.unwrap_or((0.0, 0.0)),
            delta,
            wheel_delta,
            modifiers: self.modifiers,
            buttons_down: self.buttons_down.clone(),
        }
    }

    /// Forgets held buttons, e.g. after the window loses focus.
    pub fn release_all(&mut self) {
        self.buttons_down.clear();
    }

    /// Current modifier state.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Applies a modifier change that arrived without a key or button
    /// event; later motion and wheel snapshots carry it.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
