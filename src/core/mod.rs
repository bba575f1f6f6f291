//=========================================================================
// Core Systems
//
// Everything that runs on the frame thread, independent of the window
// backend.
//
// Modules:
// - input:       input events, snapshots and the translator between them
// - render:      metal/thread contexts, lighting parser, frame rig
// - overlay:     overlay systems, the input layer and overlay sets
// - manipulator: the manipulator stack and camera control
// - vis:         model visualisation settings, cache and layers
//
// Notes:
// The platform layer feeds events in and asks for frames; nothing in
// here touches winit directly.
//
//=========================================================================

pub mod input;
pub mod manipulator;
pub mod overlay;
pub mod render;
pub mod vis;
