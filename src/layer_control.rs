//=========================================================================
// Layer Control
//
// Per-window facade that sequences one frame of overlay rendering and
// installs the default model-viewer layers.
//
// Architecture:
// ```text
//   LayerControlBuilder ──build()──> LayerControl
//                                      │
//        render(thread, window_rig) ───┤  FrameRig::execute_frame
//                                      │    └─ render_frame():
//                                      │         1. LightingParserContext
//                                      │         2. + lighting plugin
//                                      │         3. overlay.render_to_scene
//                                      │         4. pending placeholder
//                                      │         5. overlay.render_widgets
//                                      │         6. RenderResult
//                                      │
//        setup_default_vis(...) ───────┘  ModelVisLayer
//                                         VisualisationOverlay
//                                         InputLayer(ManipulatorStack)
// ```
//
// Resources that outlive a single window (the model visualisation cache)
// belong to a `ToolSession` owned by the host.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::manipulator::{CameraManipulator, ManipulatorStack, CAMERA_MANIPULATOR};
use crate::core::overlay::{InputLayer, OverlaySystem, OverlaySystemSet, SharedInputListener};
use crate::core::render::{
    draw_pending_resources, FontDesc, FrameResult, GlobalTechniqueContext, LightingParserContext,
    LightingPlugin, RenderResult, StandardLightingPlugin, ThreadContext, WindowRig,
};
use crate::core::vis::{ModelLoaderLink, ModelVisCache, ModelVisLayer, ModelVisSettings, VisualisationOverlay};

//=== ToolSession =========================================================

/// Long-lived state shared by every window of a tool.
///
/// Owns the model visualisation cache. The cache is created on first use
/// and dropped with the session or by [`release_vis_cache`](Self::release_vis_cache).
pub struct ToolSession {
    cache_capacity: usize,
    vis_cache: Option<Rc<ModelVisCache>>,
    model_loader: Option<ModelLoaderLink>,
}

impl ToolSession {
    pub fn new() -> Self {
        Self {
            cache_capacity: 64,
            vis_cache: None,
            model_loader: None,
        }
    }

    /// Sets the loader channel capacity used when the cache is created.
    ///
    /// Default: 64
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Cache capacity must be positive, got {}", capacity);
        self.cache_capacity = capacity;
        self
    }

    /// Returns the session's visualisation cache, creating it on first use.
    pub fn vis_cache(&mut self) -> Rc<ModelVisCache> {
        if let Some(cache) = &self.vis_cache {
            return Rc::clone(cache);
        }

        let (cache, link) = ModelVisCache::new(self.cache_capacity);
        let cache = Rc::new(cache);
        self.vis_cache = Some(Rc::clone(&cache));
        self.model_loader = Some(link);
        cache
    }

    /// Hands out the loader side of the cache's channels (once per cache).
    pub fn take_model_loader(&mut self) -> Option<ModelLoaderLink> {
        self.model_loader.take()
    }

    /// Drops the session's handle on the cache.
    ///
    /// Layers that still hold the cache keep it alive, but its loader link
    /// is gone, so models it has not loaded yet fail instead of staying
    /// pending. The next [`vis_cache`](Self::vis_cache) call creates a
    /// fresh cache.
    pub fn release_vis_cache(&mut self) {
        if self.vis_cache.take().is_some() {
            self.model_loader = None;
            debug!(target: "vis", "Visualisation cache released");
        }
    }
}

impl Default for ToolSession {
    fn default() -> Self {
        Self::new()
    }
}

//=== Configuration =======================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LayerControlConfig {
    /// Font of the pending-resource placeholder.
    pub placeholder_font: FontDesc,

    /// Resources listed by name before the placeholder summarises.
    pub max_listed_pending: usize,
}

impl Default for LayerControlConfig {
    fn default() -> Self {
        Self {
            placeholder_font: FontDesc::default(),
            max_listed_pending: 8,
        }
    }
}

//=== LayerControlBuilder =================================================

/// Builder for a [`LayerControl`].
///
/// # Default Values
///
/// - **Placeholder font**: "Raleway", 16
/// - **Listed pending resources**: 8
/// - **Lighting**: [`StandardLightingPlugin::default`]
///
/// # Examples
///
/// ```
/// use overlay_rig::LayerControlBuilder;
///
/// let control = LayerControlBuilder::new()
///     .with_placeholder_font("Inter", 14)
///     .with_max_listed_pending(4)
///     .build();
/// assert_eq!(control.config().max_listed_pending, 4);
/// ```
pub struct LayerControlBuilder {
    config: LayerControlConfig,
    lighting: StandardLightingPlugin,
    technique: GlobalTechniqueContext,
}

impl LayerControlBuilder {
    pub fn new() -> Self {
        Self {
            config: LayerControlConfig::default(),
            lighting: StandardLightingPlugin::default(),
            technique: GlobalTechniqueContext::new(),
        }
    }

    /// # Panics
    ///
    /// Panics if `size == 0`.
    pub fn with_placeholder_font(mut self, face: impl Into<String>, size: u32) -> Self {
        assert!(size > 0, "Placeholder font size must be positive, got {}", size);
        self.config.placeholder_font = FontDesc::new(face, size);
        self
    }

    /// # Panics
    ///
    /// Panics if `count == 0`.
    pub fn with_max_listed_pending(mut self, count: usize) -> Self {
        assert!(count > 0, "Listed pending count must be positive, got {}", count);
        self.config.max_listed_pending = count;
        self
    }

    pub fn with_lighting(mut self, lighting: StandardLightingPlugin) -> Self {
        self.lighting = lighting;
        self
    }

    pub fn with_technique(mut self, technique: GlobalTechniqueContext) -> Self {
        self.technique = technique;
        self
    }

    pub fn build(self) -> LayerControl {
        info!(
            target: "overlay",
            "Layer control ready (placeholder font: {} {})",
            self.config.placeholder_font.face,
            self.config.placeholder_font.size
        );

        LayerControl {
            plugin: Rc::new(self.lighting),
            technique: Rc::new(self.technique),
            config: self.config,
        }
    }
}

impl Default for LayerControlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== DefaultVis ==========================================================

/// Handles returned by [`LayerControl::setup_default_vis`].
pub struct DefaultVis {
    /// Manipulator stack installed behind the window's input layer.
    pub stack: Rc<RefCell<ManipulatorStack>>,

    /// Cache the model layer draws through.
    pub cache: Rc<ModelVisCache>,
}

//=== LayerControl ========================================================

pub struct LayerControl {
    plugin: Rc<StandardLightingPlugin>,
    technique: Rc<GlobalTechniqueContext>,
    config: LayerControlConfig,
}

impl LayerControl {
    pub fn config(&self) -> &LayerControlConfig {
        &self.config
    }

    pub fn technique(&self) -> &Rc<GlobalTechniqueContext> {
        &self.technique
    }

    /// Renders and presents one frame for `window_rig`.
    ///
    /// A rig without a main overlay system still produces a frame; only
    /// the lighting plugin and placeholder steps run.
    pub fn render(&mut self, thread: &mut dyn ThreadContext, window_rig: &mut dyn WindowRig) -> FrameResult {
        let chain = window_rig.presentation_chain();
        let mut chain = chain.borrow_mut();

        let frame_rig = window_rig.frame_rig();
        let overlay = frame_rig.main_overlay_system();

        frame_rig.execute_frame(thread, &mut *chain, |thread| {
            render_frame(thread, overlay.as_deref(), &self.plugin, &self.technique, &self.config)
        })
    }

    /// Installs the model viewer on `window_rig`: model layer, debug
    /// overlay, and a manipulator stack with camera control.
    pub fn setup_default_vis(
        &self,
        window_rig: &mut dyn WindowRig,
        session: &mut ToolSession,
        settings: Rc<ModelVisSettings>,
    ) -> DefaultVis {
        let cache = session.vis_cache();

        let overlay = window_rig.frame_rig().ensure_main_overlay_system();
        let mut overlay = overlay.borrow_mut();
        overlay.add_system(Box::new(ModelVisLayer::new(Rc::clone(&settings), Rc::clone(&cache))));
        overlay.add_system(Box::new(VisualisationOverlay::new(Rc::clone(&settings), Rc::clone(&cache))));

        let mut stack = ManipulatorStack::new();
        stack.register(
            CAMERA_MANIPULATOR,
            Box::new(CameraManipulator::new(Rc::clone(&settings.camera))),
        );
        let stack = Rc::new(RefCell::new(stack));
        let listener: SharedInputListener = stack.clone();
        overlay.add_system(Box::new(InputLayer::new(listener)));

        info!(target: "overlay", "Default visualisation installed for '{}'", settings.model_name);

        DefaultVis { stack, cache }
    }
}

//--- render_frame() ------------------------------------------------------
//
// Body of the frame callback. Returns whether any contributor is still
// waiting on resources.
//
fn render_frame(
    thread: &mut dyn ThreadContext,
    overlay: Option<&RefCell<OverlaySystemSet>>,
    plugin: &Rc<StandardLightingPlugin>,
    technique: &Rc<GlobalTechniqueContext>,
    config: &LayerControlConfig,
) -> RenderResult {
    let mut parser = LightingParserContext::new(Rc::clone(technique));
    let plugin: Rc<dyn LightingPlugin> = plugin.clone();
    parser.add_plugin(plugin);

    if let Some(overlay) = overlay {
        overlay.borrow_mut().render_to_scene(thread, &mut parser);
    }

    if parser.has_pending_resources() {
        draw_pending_resources(
            thread.metal_context(),
            &parser,
            &config.placeholder_font,
            config.max_listed_pending,
        );
    }

    if let Some(overlay) = overlay {
        let projection = *parser.projection_desc();
        overlay.borrow_mut().render_widgets(thread, &projection);
    }

    RenderResult::new(parser.has_pending_resources())
}

//=========================================================================
// Unit Tests
//=========================================================================
