//=========================================================================
// Model Visualisation Cache
//=========================================================================
//
// Tracks which models the viewer has asked for and which are ready.
//
// Architecture:
// ```text
//  Frame Thread:                         Loader (external):
//  ┌──────────────────────────┐          ┌──────────────────┐
//  │  ModelVisCache::lookup() │          │  asset service   │
//  │   ├─ unknown → Pending   │ request  │                  │
//  │   │   send ModelRequest ─┼─────────>│  load / parse    │
//  │   └─ drain completions <─┼──────────┤  ModelEvent      │
//  └──────────────────────────┘  event   └──────────────────┘
// ```
//
// The cache never blocks: completions are drained with `try_recv` at the
// start of every lookup. The loader side of the channels is handed out
// once as a `ModelLoaderLink`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use glam::Vec3;
use log::{debug, info, warn};

/// Failure reason recorded when the loader side of the link is dropped.
pub const LOADER_DISCONNECTED: &str = "loader disconnected";

//=== Messages ============================================================

/// Request sent to the loader for a model that is not cached yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub name: String,
}

/// Loaded model summary; the geometry itself stays in the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelScaffold {
    pub name: String,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub lod_count: u32,
}

impl ModelScaffold {
    pub fn new(name: impl Into<String>, bounds_min: Vec3, bounds_max: Vec3) -> Self {
        Self { name: name.into(), bounds_min, bounds_max, lod_count: 1 }
    }

    pub fn centre(&self) -> Vec3 {
        (self.bounds_min + self.bounds_max) * 0.5
    }
}

/// Completion reported by the loader.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    Loaded(ModelScaffold),
    Failed { name: String, reason: String },
}

/// Loader-side ends of the cache's channels.
pub struct ModelLoaderLink {
    pub requests: Receiver<ModelRequest>,
    pub events: Sender<ModelEvent>,
}

//=== Lookup ==============================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ModelLookup {
    Ready(Rc<ModelScaffold>),
    Pending,
    Failed(String),
}

#[derive(Debug)]
enum ModelEntry {
    /// Known but not yet sent to the loader (channel was full).
    Unrequested,
    Pending,
    Ready(Rc<ModelScaffold>),
    Failed(String),
}

//=== ModelVisCache =======================================================

pub struct ModelVisCache {
    models: RefCell<HashMap<String, ModelEntry>>,
    requests: Sender<ModelRequest>,
    events: Receiver<ModelEvent>,
}

impl ModelVisCache {
    /// Creates a cache whose channels hold up to `capacity` messages.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> (Self, ModelLoaderLink) {
        assert!(capacity > 0, "Cache channel capacity must be positive");

        let (request_tx, request_rx) = bounded(capacity);
        let (event_tx, event_rx) = bounded(capacity);

        info!(target: "vis", "Model visualisation cache created (capacity: {})", capacity);

        let cache = Self {
            models: RefCell::new(HashMap::new()),
            requests: request_tx,
            events: event_rx,
        };
        let link = ModelLoaderLink { requests: request_rx, events: event_tx };
        (cache, link)
    }

    /// Returns the state of `name`, requesting it from the loader on first use.
    pub fn lookup(&self, name: &str) -> ModelLookup {
        self.poll();

        let mut models = self.models.borrow_mut();
        let entry = models.entry(name.to_string()).or_insert(ModelEntry::Unrequested);

        if matches!(entry, ModelEntry::Unrequested) {
            let request = ModelRequest { name: name.to_string() };
            match self.requests.try_send(request) {
                Ok(()) => {
                    debug!(target: "vis", "Requested model '{}'", name);
                    *entry = ModelEntry::Pending;
                }
                Err(TrySendError::Full(_)) => {
                    debug!(target: "vis", "Loader queue full, will retry '{}'", name);
                }
                Err(TrySendError::Disconnected(_)) => {
                    warn!(target: "vis", "Model loader disconnected, '{}' cannot load", name);
                    *entry = ModelEntry::Failed(LOADER_DISCONNECTED.to_string());
                }
            }
        }

        match entry {
            ModelEntry::Ready(model) => ModelLookup::Ready(Rc::clone(model)),
            ModelEntry::Failed(reason) => ModelLookup::Failed(reason.clone()),
            ModelEntry::Unrequested | ModelEntry::Pending => ModelLookup::Pending,
        }
    }

    /// Applies every completion the loader has sent so far.
    ///
    /// Returns the number of completions applied.
    pub fn poll(&self) -> usize {
        let mut applied = 0;
        let mut models = self.models.borrow_mut();

        loop {
            match self.events.try_recv() {
                Ok(ModelEvent::Loaded(model)) => {
                    debug!(target: "vis", "Model '{}' ready", model.name);
                    models.insert(model.name.clone(), ModelEntry::Ready(Rc::new(model)));
                    applied += 1;
                }
                Ok(ModelEvent::Failed { name, reason }) => {
                    warn!(target: "vis", "Model '{}' failed to load: {}", name, reason);
                    models.insert(name, ModelEntry::Failed(reason));
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    applied += Self::fail_outstanding(&mut models);
                    break;
                }
            }
        }

        applied
    }

    /// Returns the model if it is loaded, without requesting it.
    pub fn ready(&self, name: &str) -> Option<Rc<ModelScaffold>> {
        self.poll();
        match self.models.borrow().get(name) {
            Some(ModelEntry::Ready(model)) => Some(Rc::clone(model)),
            _ => None,
        }
    }

    /// Fails every entry still waiting on a loader that has gone away.
    fn fail_outstanding(models: &mut HashMap<String, ModelEntry>) -> usize {
        let mut failed = 0;
        for (name, entry) in models.iter_mut() {
            if matches!(entry, ModelEntry::Pending | ModelEntry::Unrequested) {
                warn!(target: "vis", "Model loader disconnected, '{}' cannot load", name);
                *entry = ModelEntry::Failed(LOADER_DISCONNECTED.to_string());
                failed += 1;
            }
        }
        failed
    }

    /// Number of models requested but not resolved yet.
    pub fn pending_count(&self) -> usize {
        self.models
            .borrow()
            .values()
            .filter(|e| matches!(e, ModelEntry::Pending | ModelEntry::Unrequested))
            .count()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
