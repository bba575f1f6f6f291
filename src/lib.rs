//=========================================================================
// Overlay Rig: Library Root
//
// Tool-layer glue between a windowed frame loop and the interactive
// overlays drawn on top of a rendered viewport.
//
// Responsibilities:
// - Expose the per-window facade (`LayerControl`)
// - Route platform input to overlay systems and the manipulator stack
// - Sequence one frame: scene contribution, pending-resource
//   placeholders, widgets
//
// Typical usage:
// ```no_run
// use std::rc::Rc;
// use overlay_rig::prelude::*;
//
// let mut session = ToolSession::new();
// let control = LayerControlBuilder::new().build();
// let mut rig = BasicWindowRig::new(Rc::new(std::cell::RefCell::new(NullPresentationChain::default())));
// let settings = Rc::new(ModelVisSettings::new("sphere"));
// control.setup_default_vis(&mut rig, &mut session, settings);
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the engine-facing contracts and the overlay machinery.
// `platform` hosts the winit event loop for a single tool window.
//
pub mod core;
pub mod logging;
pub mod platform;
pub mod prelude;

mod layer_control;

//--- Public Exports ------------------------------------------------------

pub use layer_control::{DefaultVis, LayerControl, LayerControlBuilder, LayerControlConfig, ToolSession};
