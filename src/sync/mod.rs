//! Map control synchronization.
//!
//! [`MapSynchronizer`] owns the selection state and performs every transition
//! of the cascade synchronously. The async drivers in this module wrap the two
//! suspension points (layer catalog fetch, plot request) around it, borrowing
//! the shared synchronizer only between awaits.

mod driver;
mod synchronizer;


pub use driver::{change_dataset, plot_location, SharedSynchronizer};
pub use synchronizer::MapSynchronizer;

use crate::services::{FetchError, PlotRequest};
use crate::state::DatasetOption;
use std::fmt;

/// Identifies the latest request of an asynchronous flow.
///
/// Completions carrying an older generation are stale and dropped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A layer catalog request issued by a dataset change.
#[derive(Debug, Clone, PartialEq)]
pub struct LayersRequest {
    pub generation: Generation,
    pub dataset: DatasetOption,
}

/// A time-series request issued by a draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPlot {
    pub generation: Generation,
    pub request: PlotRequest,
}

/// Errors from the synchronizer's transitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    #[error("No layer metadata has been loaded")]
    CatalogNotLoaded,
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Unknown style {style} for variable {variable}")]
    UnknownStyle { variable: String, style: String },
    #[error("No variable is selected")]
    NoVariableSelected,
    #[error("No layer is rendered")]
    NoActiveLayer,
    #[error("Stale response {received} (latest is {latest})")]
    Stale {
        received: Generation,
        latest: Generation,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
