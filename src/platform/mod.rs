//=========================================================================
// Platform Subsystem
//
// Hosts one tool window on the winit event loop and drives the overlay
// rig from it.
//
// Architecture:
// ```text
//  Main Thread (winit loop):
//  ┌────────────────────────────────────────────────────────┐
//  │  WindowEvent                                           │
//  │   ├─ input ──> InputProcessor ──> InputTranslator      │
//  │   │               └─> main overlay set (listeners)     │
//  │   ├─ Resized ──> WindowRig::resize                     │
//  │   ├─ Focused(false) ──> release held buttons           │
//  │   └─ RedrawRequested ──> LayerControl::render          │
//  │                            └─> request next redraw     │
//  └────────────────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Single thread**: input routing and rendering share the loop thread,
//   so overlay state lives behind `Rc<RefCell<..>>` without locking
// - **Continuous redraw**: every frame requests the next one, so pending
//   loads resolve without extra wake-ups
// - **Lazy window**: created in `resumed()` (mobile compatibility)
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Crates =====================================================

use std::rc::Rc;

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::ModifiersState,
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::{InputEvent, InputTranslator};
use crate::core::overlay::InputListener;
use crate::core::render::{FrameResult, ThreadContext, Viewport, WindowRig};
use crate::core::vis::ModelVisSettings;
use crate::layer_control::{DefaultVis, LayerControl, ToolSession};
use input_processor::InputProcessor;

//=== PlatformConfig ======================================================

/// Window settings applied when the host creates its window.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    pub title: String,

    /// Initial inner size in logical pixels.
    pub width: u32,
    pub height: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Overlay Rig".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl PlatformConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.width = width;
        self.height = height;
        self
    }
}

//=== PlatformError =======================================================

/// Fatal event-loop errors.
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to create the event loop (OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// The event loop stopped with an error.
    EventLoopExecution(winit::error::EventLoopError),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EventLoopCreation(e) | Self::EventLoopExecution(e) => Some(e),
        }
    }
}

//=== WindowHost ==========================================================

/// Runs a [`LayerControl`] for one window.
///
/// `C` supplies the metal context frames render into; `R` is the window's
/// frame rig and presentation chain. Both are owned by the host for the
/// lifetime of the loop.
///
/// # Lifecycle
///
/// 1. `WindowHost::new(config, control, thread, rig)`
/// 2. `host.run()` blocks on the winit loop
/// 3. Closing the window exits the loop and `run()` returns
pub struct WindowHost<C: ThreadContext, R: WindowRig> {
    config: PlatformConfig,
    window: Option<Window>,
    control: LayerControl,
    thread: C,
    rig: R,
    processor: InputProcessor,
    translator: InputTranslator,
}

impl<C: ThreadContext, R: WindowRig> WindowHost<C, R> {
    pub fn new(config: PlatformConfig, control: LayerControl, thread: C, rig: R) -> Self {
        info!(target: "platform", "Window host initialized ('{}')", config.title);
        Self {
            config,
            window: None,
            control,
            thread,
            rig,
            processor: InputProcessor::new(),
            translator: InputTranslator::new(),
        }
    }

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the loop cannot be created or stops
    /// with an error.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread on platforms where winit
    /// requires it (macOS/iOS).
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    pub fn control(&self) -> &LayerControl {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut LayerControl {
        &mut self.control
    }

    /// Installs the default model viewer on this host's window rig.
    pub fn setup_default_vis(&mut self, session: &mut ToolSession, settings: Rc<ModelVisSettings>) -> DefaultVis {
        self.control.setup_default_vis(&mut self.rig, session, settings)
    }

    pub fn rig(&self) -> &R {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut R {
        &mut self.rig
    }

    //--- Frame Thread Work ------------------------------------------------

    /// Routes one input event to the main overlay set.
    ///
    /// Returns `true` if a listener consumed it.
    pub fn dispatch_input(&mut self, event: InputEvent) -> bool {
        let snapshot = self.translator.translate(event);

        let Some(overlay) = self.rig.frame_rig().main_overlay_system() else {
            trace!(target: "platform::input", "No overlay system, input dropped");
            return false;
        };
        let consumed = overlay.borrow_mut().on_input_event(&snapshot);
        consumed
    }

    /// Renders and presents one frame.
    pub fn render_frame(&mut self) -> FrameResult {
        self.control.render(&mut self.thread, &mut self.rig)
    }

    /// Records a modifier change for both later platform events and the
    /// snapshots of motion/wheel input, which carry no modifiers of their own.
    pub fn update_modifiers(&mut self, state: ModifiersState) {
        self.processor.update_modifiers(state);
        let modifiers = self.processor.modifiers();
        trace!(target: "platform::input", "Modifiers changed: {:?}", modifiers);
        self.translator.set_modifiers(modifiers);
    }

    /// Forgets held buttons, e.g. after focus loss.
    pub fn release_input(&mut self) {
        self.translator.release_all();
    }
}

//=== Winit Integration ===================================================

impl<C: ThreadContext, R: WindowRig> ApplicationHandler for WindowHost<C, R> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.rig.resize(Viewport::new(size.width, size.height));
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                debug!(target: "platform", "Resized to {}x{}", size.width, size.height);
                self.rig.resize(Viewport::new(size.width, size.height));
            }

            WindowEvent::Focused(false) => {
                trace!(target: "platform::input", "Focus lost, releasing held buttons");
                self.release_input();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.update_modifiers(modifiers.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.processor.process_mouse_move(position.x, position.y);
                self.dispatch_input(event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let event = self.processor.process_mouse_wheel(delta);
                self.dispatch_input(event);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.processor.process_mouse_button(button, state);
                self.dispatch_input(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.processor.process_key_event(&key_event) {
                    Some(event) => {
                        self.dispatch_input(event);
                    }
                    None => trace!(target: "platform::input", "Unmapped key ignored"),
                }
            }

            WindowEvent::RedrawRequested => {
                let result = self.render_frame();
                if result.has_pending_resources {
                    trace!(target: "platform", "Frame {} waiting on resources", result.frame_index);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::core::input::{Modifiers, MouseButton};
    use crate::core::manipulator::{ManipulatorState, CAMERA_MANIPULATOR};
    use crate::core::render::{BasicWindowRig, FrameRig, NullPresentationChain, RecordingContext};
    use crate::core::vis::VisCameraSettings;
    use crate::LayerControlBuilder;

    type TestHost = WindowHost<RecordingContext, BasicWindowRig>;

    fn host(rig: BasicWindowRig) -> TestHost {
        WindowHost::new(
            PlatformConfig::default(),
            LayerControlBuilder::new().build(),
            RecordingContext::default(),
            rig,
        )
    }

    fn rig() -> BasicWindowRig {
        BasicWindowRig::new(Rc::new(RefCell::new(NullPresentationChain::default())))
    }

    fn middle(pressed: bool) -> InputEvent {
        if pressed {
            InputEvent::MouseButtonDown { button: MouseButton::Middle, modifiers: Modifiers::NONE }
        } else {
            InputEvent::MouseButtonUp { button: MouseButton::Middle, modifiers: Modifiers::NONE }
        }
    }

    #[test]
    fn window_is_created_lazily() {
        let host = host(rig());
        assert!(host.window.is_none());
    }

    #[test]
    fn input_reaches_manipulator_stack() {
        let mut session = ToolSession::new();
        let mut host = host(rig());
        let vis = host.setup_default_vis(&mut session, Rc::new(ModelVisSettings::new("a")));

        assert!(!host.dispatch_input(middle(true)));
        assert_eq!(vis.stack.borrow().state(CAMERA_MANIPULATOR), Some(ManipulatorState::Active));

        host.dispatch_input(middle(false));
        assert_eq!(vis.stack.borrow().state(CAMERA_MANIPULATOR), Some(ManipulatorState::Inactive));
    }

    #[test]
    fn shift_pressed_mid_drag_switches_to_pan() {
        let mut session = ToolSession::new();
        let mut host = host(rig());
        let settings = Rc::new(ModelVisSettings::new("a"));
        let camera = Rc::clone(&settings.camera);
        host.setup_default_vis(&mut session, settings);

        host.dispatch_input(InputEvent::MouseMoved { x: 0.0, y: 0.0 });
        host.dispatch_input(middle(true));
        host.update_modifiers(ModifiersState::SHIFT);
        host.dispatch_input(InputEvent::MouseMoved { x: 100.0, y: 0.0 });

        let camera = camera.borrow();
        assert_ne!(camera.focus, glam::Vec3::ZERO);
        assert!((camera.distance() - VisCameraSettings::default().distance()).abs() < 1e-4);
    }

    #[test]
    fn modifier_release_mid_drag_returns_to_orbit() {
        let mut session = ToolSession::new();
        let mut host = host(rig());
        let settings = Rc::new(ModelVisSettings::new("a"));
        let camera = Rc::clone(&settings.camera);
        host.setup_default_vis(&mut session, settings);

        host.update_modifiers(ModifiersState::SHIFT);
        host.dispatch_input(InputEvent::MouseMoved { x: 0.0, y: 0.0 });
        host.dispatch_input(middle(true));
        host.update_modifiers(ModifiersState::empty());
        host.dispatch_input(InputEvent::MouseMoved { x: 100.0, y: 0.0 });

        let camera = camera.borrow();
        assert_eq!(camera.focus, glam::Vec3::ZERO);
        assert_ne!(camera.position, VisCameraSettings::default().position);
    }

    #[test]
    fn input_without_overlay_is_dropped() {
        let mut host = host(BasicWindowRig::with_frame_rig(
            FrameRig::without_overlay_system(),
            Rc::new(RefCell::new(NullPresentationChain::default())),
        ));
        assert!(!host.dispatch_input(middle(true)));
    }

    #[test]
    fn render_frame_advances_frame_index() {
        let mut host = host(rig());
        assert_eq!(host.render_frame().frame_index, 1);
        assert_eq!(host.render_frame().frame_index, 2);
    }

    #[test]
    fn platform_config_builder() {
        let config = PlatformConfig::default().with_title("Viewer").with_size(640, 480);
        assert_eq!(config.title, "Viewer");
        assert_eq!((config.width, config.height), (640, 480));
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn zero_window_size_panics() {
        let _ = PlatformConfig::default().with_size(0, 480);
    }

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }
}
