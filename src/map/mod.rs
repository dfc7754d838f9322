//! Map widget abstraction.
//!
//! The synchronizer never calls the mapping library directly; it goes through
//! [`MapAdapter`] so the cascade can run against a fake map in tests. The
//! Leaflet implementation lives in `leaflet` and is only built for wasm32.

#[cfg(target_arch = "wasm32")]
mod leaflet;

#[cfg(target_arch = "wasm32")]
pub use leaflet::{LeafletMap, MapSubscription, TileEvent};

use crate::state::DrawnLocation;
use crate::wms::{BoundingBox, WmsLayerSpec};
use chrono::{DateTime, Utc};

/// Operations the synchronizer needs from the map widget.
pub trait MapAdapter {
    /// Adds a time-aware WMS layer. Any previous layer must be cleared first.
    fn render_layer(&mut self, spec: &WmsLayerSpec);

    /// Removes the current WMS layer, if any. Its tile events stop with it.
    fn clear_layer(&mut self);

    /// Refits the viewport to the given extent.
    fn fit_bounds(&mut self, bbox: &BoundingBox);

    /// Times the time-dimension control currently offers, in ascending order.
    fn available_times(&self) -> Vec<DateTime<Utc>>;

    /// Removes every drawn feature from the draw overlay.
    fn clear_drawn_items(&mut self);

    /// Shows a drawn location on the draw overlay.
    fn add_drawn_item(&mut self, location: &DrawnLocation);
}
