//! Client state for the map viewer.
//!
//! Holds the user's selection, the cascade stage it has reached, the drawn
//! location, and the viewer configuration. Nothing here is persisted; state is
//! rebuilt from the server on every page load.

mod drawn;
mod loading;
mod selection;
mod settings;

pub use drawn::DrawnLocation;
pub use loading::LoadingTracker;
pub use selection::{CascadeStage, DatasetOption, Selection};
pub use settings::ViewerConfig;
