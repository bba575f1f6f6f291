//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit window events into `InputEvent`s for the overlay rig.
//
// Architecture:
//   WindowEvent → InputProcessor → InputEvent → InputTranslator → listeners
//
// Modifier state is cached from `ModifiersChanged` and stamped onto every
// key and button event. Keys the rig has no code for are dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

/// Pixel scroll distance treated as one wheel line (touchpads).
const PIXELS_PER_LINE: f32 = 20.0;

//=== InputProcessor ======================================================

#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    modifiers: Modifiers,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Modifiers --------------------------------------------------------

    pub(crate) fn update_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
    }

    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //--- Conversion -------------------------------------------------------

    /// Returns `None` for keys without a `KeyCode`.
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = key_event.physical_key else {
            return None;
        };
        self.key_event(KeyCode::from(code), key_event.state)
    }

    pub(crate) fn process_mouse_button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let button = MouseButton::from(button);
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }

    pub(crate) fn process_mouse_move(&self, x: f64, y: f64) -> InputEvent {
        InputEvent::MouseMoved { x: x as f32, y: y as f32 }
    }

    /// Wheel movement in lines, positive away from the user.
    pub(crate) fn process_mouse_wheel(&self, delta: MouseScrollDelta) -> InputEvent {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
        };
        InputEvent::MouseWheel { delta: lines }
    }

    fn key_event(&self, key: KeyCode, state: ElementState) -> Option<InputEvent> {
        if key == KeyCode::Unidentified {
            return None;
        }
        let modifiers = self.modifiers;
        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        })
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// macOS Cmd/Option arrive from winit as Ctrl/Alt already.
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;
        match code {
            W::KeyA => Self::KeyA,
            W::KeyB => Self::KeyB,
            W::KeyC => Self::KeyC,
            W::KeyD => Self::KeyD,
            W::KeyE => Self::KeyE,
            W::KeyF => Self::KeyF,
            W::KeyG => Self::KeyG,
            W::KeyH => Self::KeyH,
            W::KeyI => Self::KeyI,
            W::KeyJ => Self::KeyJ,
            W::KeyK => Self::KeyK,
            W::KeyL => Self::KeyL,
            W::KeyM => Self::KeyM,
            W::KeyN => Self::KeyN,
            W::KeyO => Self::KeyO,
            W::KeyP => Self::KeyP,
            W::KeyQ => Self::KeyQ,
            W::KeyR => Self::KeyR,
            W::KeyS => Self::KeyS,
            W::KeyT => Self::KeyT,
            W::KeyU => Self::KeyU,
            W::KeyV => Self::KeyV,
            W::KeyW => Self::KeyW,
            W::KeyX => Self::KeyX,
            W::KeyY => Self::KeyY,
            W::KeyZ => Self::KeyZ,

            W::ArrowUp => Self::ArrowUp,
            W::ArrowDown => Self::ArrowDown,
            W::ArrowLeft => Self::ArrowLeft,
            W::ArrowRight => Self::ArrowRight,

            W::Space => Self::Space,
            W::Enter => Self::Enter,
            W::Escape => Self::Escape,
            W::Tab => Self::Tab,
            W::Backspace => Self::Backspace,
            W::Delete => Self::Delete,

            _ => Self::Unidentified,
        }
    }
}

/// Back/Forward and extra buttons collapse to `Other`.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => Self::Left,
            WinitMouseButton::Right => Self::Right,
            WinitMouseButton::Middle => Self::Middle,
            _ => Self::Other,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
