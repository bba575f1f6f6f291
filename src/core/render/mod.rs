//=========================================================================
// Render Contracts
//=========================================================================
//
// Narrow interfaces to the external renderer.
//
// Architecture:
//   ThreadContext ──metal_context()──> MetalContext ──submit()──> backend
//
// The overlay glue never talks to a GPU directly: it only emits
// `DrawCommand`s. A backend replays them; `RecordingContext` keeps them
// in memory for headless hosts and tests.
//
//=========================================================================

//=== Module Declarations =================================================

mod frame_rig;
mod lighting;
mod pending;

//=== Public API ==========================================================

pub use frame_rig::{
    BasicWindowRig, FrameResult, FrameRig, NullPresentationChain, PresentationChain,
    RenderResult, SharedPresentationChain, WindowRig,
};
pub use lighting::{
    GlobalTechniqueContext, LightingParserContext, LightingPlugin, PendingResource,
    ProjectionDesc, ResourceKind, StandardLightingPlugin,
};
pub use pending::draw_pending_resources;

//=== External Dependencies ===============================================

use glam::{Mat4, Vec2, Vec3};

//=== Basic Types =========================================================

/// RGBA colour, linear, 0..1 per channel.
pub type Colour = [f32; 4];

/// Render target size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; 1.0 for a degenerate (zero height) viewport.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Font face and pixel size used for overlay text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontDesc {
    pub face: String,
    pub size: u32,
}

impl FontDesc {
    pub fn new(face: impl Into<String>, size: u32) -> Self {
        Self { face: face.into(), size }
    }
}

impl Default for FontDesc {
    fn default() -> Self {
        Self::new("Raleway", 16)
    }
}

//=== DrawCommand =========================================================

/// A single request to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Draw a loaded model.
    Model {
        name: String,
        level_of_detail: u32,
        world_to_projection: Mat4,
    },

    /// Wireframe overlay for a model.
    Wireframe { name: String },

    /// Vertex normal visualisation for a model.
    Normals { name: String },

    /// Lighting resolve issued by a lighting plugin.
    LightingResolve { ambient: Vec3, sun_direction: Vec3 },

    /// Solid screen-space rectangle (pixels).
    Rect { min: Vec2, max: Vec2, colour: Colour },

    /// Screen-space text (pixels, top-left of the first line).
    Text {
        font: FontDesc,
        position: Vec2,
        colour: Colour,
        text: String,
    },
}

//=== Context Traits ======================================================

/// Immediate-mode graphics context for the current frame.
pub trait MetalContext {
    /// Size of the current render target.
    fn viewport(&self) -> Viewport;

    /// Queues a command for the renderer.
    fn submit(&mut self, command: DrawCommand);
}

/// Per-thread device context handed to frame callbacks.
pub trait ThreadContext {
    fn metal_context(&mut self) -> &mut dyn MetalContext;
}

//=== RecordingContext ====================================================

/// Thread and metal context that records every submitted command.
#[derive(Debug, Clone)]
pub struct RecordingContext {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
}

impl RecordingContext {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport, commands: Vec::new() }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Takes all recorded commands, leaving the recording empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Text of every recorded `Text` command, in submission order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new(Viewport::new(1280, 720))
    }
}

impl MetalContext for RecordingContext {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl ThreadContext for RecordingContext {
    fn metal_context(&mut self) -> &mut dyn MetalContext {
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
