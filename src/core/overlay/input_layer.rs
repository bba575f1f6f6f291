//=========================================================================
// Input Layer
//=========================================================================
//
// Makes a bare input listener usable as an overlay system so it can sit
// in the main overlay set and receive routed input. Draws nothing.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::{OverlaySystem, SharedInputListener};
use crate::core::render::{LightingParserContext, ProjectionDesc, ThreadContext};

//=== InputLayer ==========================================================

pub struct InputLayer {
    listener: SharedInputListener,
}

impl InputLayer {
    pub fn new(listener: SharedInputListener) -> Self {
        Self { listener }
    }
}

impl OverlaySystem for InputLayer {
    fn input_listener(&self) -> Option<SharedInputListener> {
        Some(Rc::clone(&self.listener))
    }

    fn render_to_scene(&mut self, _thread: &mut dyn ThreadContext, _parser: &mut LightingParserContext) {}

    fn render_widgets(&mut self, _thread: &mut dyn ThreadContext, _projection: &ProjectionDesc) {}

    fn set_activation_state(&mut self, _active: bool) {}
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::core::input::{InputEvent, InputSnapshot};
    use crate::core::overlay::InputListener;
    use crate::core::render::{GlobalTechniqueContext, RecordingContext};

    #[derive(Default)]
    struct Counter {
        seen: usize,
    }

    impl InputListener for Counter {
        fn on_input_event(&mut self, _snapshot: &InputSnapshot) -> bool {
            self.seen += 1;
            false
        }
    }

    #[test]
    fn exposes_the_wrapped_listener() {
        let counter = Rc::new(RefCell::new(Counter::default()));
        let layer = InputLayer::new(counter.clone());

        let listener = layer.input_listener().expect("listener");
        listener
            .borrow_mut()
            .on_input_event(&InputSnapshot::from_event(InputEvent::Unidentified));

        assert_eq!(counter.borrow().seen, 1);
    }

    #[test]
    fn render_hooks_draw_nothing() {
        let mut layer = InputLayer::new(Rc::new(RefCell::new(Counter::default())));
        let mut thread = RecordingContext::default();
        let mut parser = LightingParserContext::new(Rc::new(GlobalTechniqueContext::new()));

        layer.render_to_scene(&mut thread, &mut parser);
        layer.render_widgets(&mut thread, &ProjectionDesc::default());
        layer.set_activation_state(true);

        assert!(thread.commands().is_empty());
        assert!(!parser.has_pending_resources());
    }
}
