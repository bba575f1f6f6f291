//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use overlay_rig::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Layer control
pub use crate::{DefaultVis, LayerControl, LayerControlBuilder, LayerControlConfig, ToolSession};

// Input
pub use crate::core::input::{InputEvent, InputSnapshot, InputTranslator, KeyCode, Modifiers, MouseButton};

// Overlay systems
pub use crate::core::overlay::{InputLayer, InputListener, OverlaySystem, OverlaySystemSet, SharedInputListener};

// Manipulators
pub use crate::core::manipulator::{
    CameraManipulator, Handling, IntersectionContext, IntersectionScene, Manipulator, ManipulatorId,
    ManipulatorStack, ManipulatorState, CAMERA_MANIPULATOR,
};

// Rendering contracts
pub use crate::core::render::{
    BasicWindowRig, DrawCommand, FontDesc, FrameResult, FrameRig, LightingParserContext, LightingPlugin,
    MetalContext, NullPresentationChain, PresentationChain, ProjectionDesc, RecordingContext, RenderResult,
    StandardLightingPlugin, ThreadContext, Viewport, WindowRig,
};

// Model visualisation
pub use crate::core::vis::{ModelEvent, ModelLoaderLink, ModelScaffold, ModelVisCache, ModelVisSettings, VisCameraSettings};

// Platform host and logging
pub use crate::logging::{init_logging, LoggingConfig};
pub use crate::platform::{PlatformConfig, PlatformError, WindowHost};
