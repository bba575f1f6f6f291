//=========================================================================
// Overlay System Set
//=========================================================================
//
// Ordered collection of overlay systems that behaves as one.
//
// Render calls fan out to every child in insertion order. Input is
// offered to each child's listener in the same order and stops at the
// first listener that consumes it.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{InputListener, OverlaySystem};
use crate::core::input::InputSnapshot;
use crate::core::render::{LightingParserContext, ProjectionDesc, ThreadContext};

//=== OverlaySystemSet ====================================================

#[derive(Default)]
pub struct OverlaySystemSet {
    systems: Vec<Box<dyn OverlaySystem>>,
    active: bool,
}

impl OverlaySystemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a system; it renders after (and receives input after) the
    /// systems already in the set.
    pub fn add_system(&mut self, mut system: Box<dyn OverlaySystem>) {
        if self.active {
            system.set_activation_state(true);
        }
        self.systems.push(system);
        debug!(target: "overlay", "Overlay system added ({} total)", self.systems.len());
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl OverlaySystem for OverlaySystemSet {
    fn render_to_scene(&mut self, thread: &mut dyn ThreadContext, parser: &mut LightingParserContext) {
        for system in &mut self.systems {
            system.render_to_scene(thread, parser);
        }
    }

    fn render_widgets(&mut self, thread: &mut dyn ThreadContext, projection: &ProjectionDesc) {
        for system in &mut self.systems {
            system.render_widgets(thread, projection);
        }
    }

    fn set_activation_state(&mut self, active: bool) {
        self.active = active;
        for system in &mut self.systems {
            system.set_activation_state(active);
        }
    }
}

impl InputListener for OverlaySystemSet {
    fn on_input_event(&mut self, snapshot: &InputSnapshot) -> bool {
        for (index, system) in self.systems.iter().enumerate() {
            let Some(listener) = system.input_listener() else {
                continue;
            };
            if listener.borrow_mut().on_input_event(snapshot) {
                trace!(target: "overlay", "Input consumed by overlay system #{}", index);
                return true;
            }
        }
        false
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::core::input::InputEvent;
    use crate::core::overlay::{InputLayer, SharedInputListener};
    use crate::core::render::{DrawCommand, GlobalTechniqueContext, RecordingContext};

    struct Listener {
        consume: bool,
        calls: Rc<Cell<usize>>,
    }

    impl InputListener for Listener {
        fn on_input_event(&mut self, _snapshot: &InputSnapshot) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.consume
        }
    }

    fn listener(consume: bool, calls: &Rc<Cell<usize>>) -> SharedInputListener {
        Rc::new(RefCell::new(Listener { consume, calls: Rc::clone(calls) }))
    }

    struct Tagged {
        name: &'static str,
        active: Rc<Cell<bool>>,
    }

    impl OverlaySystem for Tagged {
        fn render_to_scene(&mut self, thread: &mut dyn ThreadContext, _parser: &mut LightingParserContext) {
            thread.metal_context().submit(DrawCommand::Wireframe { name: self.name.into() });
        }

        fn render_widgets(&mut self, thread: &mut dyn ThreadContext, _projection: &ProjectionDesc) {
            thread.metal_context().submit(DrawCommand::Normals { name: self.name.into() });
        }

        fn set_activation_state(&mut self, active: bool) {
            self.active.set(active);
        }
    }

    fn snapshot() -> InputSnapshot {
        InputSnapshot::from_event(InputEvent::MouseWheel { delta: 1.0 })
    }

    #[test]
    fn input_stops_at_first_consumer() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let third = Rc::new(Cell::new(0));

        let mut set = OverlaySystemSet::new();
        set.add_system(Box::new(InputLayer::new(listener(false, &first))));
        set.add_system(Box::new(InputLayer::new(listener(true, &second))));
        set.add_system(Box::new(InputLayer::new(listener(false, &third))));

        assert!(set.on_input_event(&snapshot()));
        assert_eq!((first.get(), second.get(), third.get()), (1, 1, 0));
    }

    #[test]
    fn systems_without_listeners_are_skipped() {
        let calls = Rc::new(Cell::new(0));
        let mut set = OverlaySystemSet::new();
        set.add_system(Box::new(Tagged { name: "a", active: Rc::default() }));
        set.add_system(Box::new(InputLayer::new(listener(false, &calls))));

        assert!(!set.on_input_event(&snapshot()));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn render_calls_follow_insertion_order() {
        let mut set = OverlaySystemSet::new();
        set.add_system(Box::new(Tagged { name: "a", active: Rc::default() }));
        set.add_system(Box::new(Tagged { name: "b", active: Rc::default() }));

        let mut thread = RecordingContext::default();
        let mut parser = LightingParserContext::new(Rc::new(GlobalTechniqueContext::new()));
        set.render_to_scene(&mut thread, &mut parser);
        set.render_widgets(&mut thread, &ProjectionDesc::default());

        assert_eq!(
            thread.commands(),
            &[
                DrawCommand::Wireframe { name: "a".into() },
                DrawCommand::Wireframe { name: "b".into() },
                DrawCommand::Normals { name: "a".into() },
                DrawCommand::Normals { name: "b".into() },
            ]
        );
    }

    #[test]
    fn activation_reaches_existing_and_later_systems() {
        let early = Rc::new(Cell::new(false));
        let late = Rc::new(Cell::new(false));

        let mut set = OverlaySystemSet::new();
        set.add_system(Box::new(Tagged { name: "early", active: early.clone() }));
        set.set_activation_state(true);
        set.add_system(Box::new(Tagged { name: "late", active: late.clone() }));

        assert!(early.get());
        assert!(late.get());
    }
}
