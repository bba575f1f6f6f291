//=========================================================================
// Model Visualisation
//=========================================================================
//
// "Load a model and look at it": settings, the cache that tracks model
// readiness, and the overlay layers that draw it.
//
//=========================================================================

//=== Module Declarations =================================================

mod cache;
mod layers;
mod settings;

//=== Public API ==========================================================

pub use cache::{ModelEvent, ModelLoaderLink, ModelLookup, ModelRequest, ModelScaffold, ModelVisCache};
pub use layers::{ModelVisLayer, VisualisationOverlay};
pub use settings::{ModelVisSettings, VisCameraSettings};
