//! WMS layer metadata and tile parameters.
//!
//! The server does the capabilities parsing; this module only models what it
//! returns and what the tile layer is asked to request.

mod catalog;
mod params;

pub use catalog::{BoundingBox, LayerCatalog, LayerInfo, LayersResponse, StyleInfo};
pub use params::{tile_url, WmsLayerSpec};
