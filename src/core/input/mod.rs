//=========================================================================
// Input
//
// Engine-level input types shared by the platform layer, overlay
// systems and manipulators.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod snapshot;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use snapshot::{InputSnapshot, InputTranslator};
