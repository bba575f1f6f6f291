//=========================================================================
// Frame Rig
//=========================================================================
//
// Executes one frame for a window and presents it.
//
// Architecture:
// ```text
//   WindowRig
//     ├─ FrameRig
//     │    ├─ main overlay system (OverlaySystemSet)
//     │    └─ execute_frame(thread, chain, callback) → FrameResult
//     └─ PresentationChain
// ```
//
// The callback does the actual drawing and reports whether resources are
// still pending; the rig adds bookkeeping (frame index, timing) and
// presents the result.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{ThreadContext, Viewport};
use crate::core::overlay::OverlaySystemSet;

//=== PresentationChain ===================================================

/// Swap chain abstraction owned by the window.
pub trait PresentationChain {
    fn viewport(&self) -> Viewport;

    /// Presents everything submitted through `thread` this frame.
    fn present(&mut self, thread: &mut dyn ThreadContext);

    /// Called when the window's surface changes size.
    fn resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }
}

/// Presentation chain shared between the window and its frame loop.
pub type SharedPresentationChain = Rc<RefCell<dyn PresentationChain>>;

/// Presentation chain that only counts presents. Used by headless hosts.
#[derive(Debug, Clone)]
pub struct NullPresentationChain {
    viewport: Viewport,
    presented: u64,
}

impl NullPresentationChain {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport, presented: 0 }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Default for NullPresentationChain {
    fn default() -> Self {
        Self::new(Viewport::new(1280, 720))
    }
}

impl PresentationChain for NullPresentationChain {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn present(&mut self, _thread: &mut dyn ThreadContext) {
        self.presented += 1;
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

//=== Results =============================================================

/// Outcome reported by a frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderResult {
    pub has_pending_resources: bool,
}

impl RenderResult {
    pub fn new(has_pending_resources: bool) -> Self {
        Self { has_pending_resources }
    }
}

/// Outcome of [`FrameRig::execute_frame`].
///
/// `has_pending_resources` tells the host to keep scheduling redraws
/// until the loads resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    pub frame_index: u64,
    pub has_pending_resources: bool,
    pub duration: Duration,
}

//=== FrameRig ============================================================

pub struct FrameRig {
    main_overlay: Option<Rc<RefCell<OverlaySystemSet>>>,
    frame_index: u64,
    last_result: Option<FrameResult>,
}

impl FrameRig {
    /// Creates a frame rig with an empty main overlay set.
    pub fn new() -> Self {
        Self {
            main_overlay: Some(Rc::new(RefCell::new(OverlaySystemSet::new()))),
            frame_index: 0,
            last_result: None,
        }
    }

    /// Creates a frame rig with no overlay system attached.
    pub fn without_overlay_system() -> Self {
        Self {
            main_overlay: None,
            frame_index: 0,
            last_result: None,
        }
    }

    //--- Overlay System ---------------------------------------------------

    pub fn main_overlay_system(&self) -> Option<Rc<RefCell<OverlaySystemSet>>> {
        self.main_overlay.clone()
    }

    pub fn set_main_overlay_system(&mut self, overlay: Option<Rc<RefCell<OverlaySystemSet>>>) {
        self.main_overlay = overlay;
    }

    /// Returns the main overlay set, installing an empty one if absent.
    pub fn ensure_main_overlay_system(&mut self) -> Rc<RefCell<OverlaySystemSet>> {
        Rc::clone(
            self.main_overlay
                .get_or_insert_with(|| Rc::new(RefCell::new(OverlaySystemSet::new()))),
        )
    }

    //--- Execution --------------------------------------------------------

    /// Runs `render` for one frame, then presents through `chain`.
    pub fn execute_frame<F>(
        &mut self,
        thread: &mut dyn ThreadContext,
        chain: &mut dyn PresentationChain,
        render: F,
    ) -> FrameResult
    where
        F: FnOnce(&mut dyn ThreadContext) -> RenderResult,
    {
        let start = Instant::now();
        self.frame_index += 1;

        let rendered = render(thread);
        chain.present(thread);

        let result = FrameResult {
            frame_index: self.frame_index,
            has_pending_resources: rendered.has_pending_resources,
            duration: start.elapsed(),
        };

        let was_pending = self.last_result.is_some_and(|r| r.has_pending_resources);
        if was_pending != result.has_pending_resources {
            debug!(
                target: "frame",
                "Frame {}: pending resources {}",
                result.frame_index,
                if result.has_pending_resources { "outstanding" } else { "resolved" }
            );
        }
        trace!(target: "frame", "Frame {} took {:?}", result.frame_index, result.duration);

        self.last_result = Some(result);
        result
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn last_result(&self) -> Option<FrameResult> {
        self.last_result
    }
}

impl Default for FrameRig {
    fn default() -> Self {
        Self::new()
    }
}

//=== WindowRig ===========================================================

/// Per-window rendering rig supplied by the host.
pub trait WindowRig {
    fn frame_rig(&mut self) -> &mut FrameRig;

    fn presentation_chain(&self) -> SharedPresentationChain;

    /// Called by the platform host when the window is resized.
    fn resize(&mut self, viewport: Viewport) {
        self.presentation_chain().borrow_mut().resize(viewport);
    }
}

/// Window rig made of a frame rig and a shared presentation chain.
pub struct BasicWindowRig {
    frame_rig: FrameRig,
    chain: SharedPresentationChain,
}

impl BasicWindowRig {
    pub fn new(chain: SharedPresentationChain) -> Self {
        Self { frame_rig: FrameRig::new(), chain }
    }

    pub fn with_frame_rig(frame_rig: FrameRig, chain: SharedPresentationChain) -> Self {
        Self { frame_rig, chain }
    }
}

impl WindowRig for BasicWindowRig {
    fn frame_rig(&mut self) -> &mut FrameRig {
        &mut self.frame_rig
    }

    fn presentation_chain(&self) -> SharedPresentationChain {
        Rc::clone(&self.chain)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::RecordingContext;

    #[test]
    fn execute_frame_counts_and_presents() {
        let mut rig = FrameRig::new();
        let mut thread = RecordingContext::default();
        let mut chain = NullPresentationChain::default();

        let first = rig.execute_frame(&mut thread, &mut chain, |_| RenderResult::new(true));
        let second = rig.execute_frame(&mut thread, &mut chain, |_| RenderResult::new(false));

        assert_eq!(first.frame_index, 1);
        assert!(first.has_pending_resources);
        assert_eq!(second.frame_index, 2);
        assert!(!second.has_pending_resources);
        assert_eq!(chain.presented(), 2);
        assert_eq!(rig.last_result(), Some(second));
    }

    #[test]
    fn ensure_main_overlay_system_installs_once() {
        let mut rig = FrameRig::without_overlay_system();
        assert!(rig.main_overlay_system().is_none());

        let first = rig.ensure_main_overlay_system();
        let second = rig.ensure_main_overlay_system();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn window_rig_resize_reaches_chain() {
        let chain = Rc::new(RefCell::new(NullPresentationChain::default()));
        let mut rig = BasicWindowRig::new(chain.clone());

        rig.resize(Viewport::new(640, 480));
        assert_eq!(chain.borrow().viewport(), Viewport::new(640, 480));
    }
}
