//=========================================================================
// Input Event Types
//
// Engine-side representation of low-level input.
//
// The platform layer converts winit events into these types; everything
// above it (overlay systems, manipulators) only ever sees `InputEvent`
// and the snapshots built from it.
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputTranslator → InputSnapshot
//         ↓
//    OverlaySystemSet → InputListener → ManipulatorStack
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click). Activates camera control.
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Only keys used by tool shortcuts are mapped; anything else arrives
/// as `Unidentified` and is filtered by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Key not mapped by the platform layer.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Left/right variants are not distinguished. On macOS Ctrl maps to
/// Command and Alt to Option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };

    /// Shift only.
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };

    /// Ctrl only.
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };

    /// Alt only.
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };

    /// Returns `true` if no modifier is held.
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt)
    }
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// - **KeyDown/KeyUp**: discrete keyboard events with modifier state
/// - **MouseButtonDown/MouseButtonUp**: discrete mouse button events
/// - **MouseMoved**: cursor position in window pixels, top-left origin
/// - **MouseWheel**: scroll in lines, positive away from the user
/// - **Unidentified**: unsupported events, ignored downstream
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    MouseButtonDown {
        button: MouseButton,
        modifiers: Modifiers,
    },

    MouseButtonUp {
        button: MouseButton,
        modifiers: Modifiers,
    },

    MouseMoved { x: f32, y: f32 },

    MouseWheel { delta: f32 },

    Unidentified,
}

impl InputEvent {
    /// Returns a new event with updated modifiers (consumes self).
    ///
    /// Has no effect on `MouseMoved`, `MouseWheel` and `Unidentified`.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        match &mut self {
            Self::KeyDown { modifiers: m, .. }
            | Self::KeyUp { modifiers: m, .. }
            | Self::MouseButtonDown { modifiers: m, .. }
            | Self::MouseButtonUp { modifiers: m, .. } => {
                *m = modifiers;
            }
            _ => {}
        }
        self
    }

    /// Modifier state carried by the event, if it carries one.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. }
            | Self::MouseButtonDown { modifiers, .. }
            | Self::MouseButtonUp { modifiers, .. } => Some(*modifiers),
            _ => None,
        }
    }

    /// Returns `true` if this event presses `button`.
    pub fn is_press(&self, button: MouseButton) -> bool {
        matches!(self, Self::MouseButtonDown { button: b, .. } if *b == button)
    }

    /// Returns `true` if this event releases `button`.
    pub fn is_release(&self, button: MouseButton) -> bool {
        matches!(self, Self::MouseButtonUp { button: b, .. } if *b == button)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
