//! Viewer configuration.
//!
//! Defaults match the THREDDS app's routes. Overrides can be stored as JSON in
//! localStorage so a deployment can point the viewer at other endpoints.

use serde::{Deserialize, Serialize};

/// Endpoints and rendering parameters for the map viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Endpoint returning the layer catalog for a WMS URL.
    pub layers_endpoint: String,
    /// Endpoint rendering a time series for a drawn location.
    pub plot_endpoint: String,
    /// Same-origin proxy forwarding tile requests to the WMS server.
    pub tile_proxy_endpoint: String,
    /// Route tiles through `tile_proxy_endpoint` instead of the WMS URL.
    pub use_tile_proxy: bool,
    /// Fixed color scale range (min, max).
    pub color_scale_range: [f64; 2],
    pub num_color_bands: u32,
    pub initial_zoom: u8,
    /// Initial map center as (lat, lng).
    pub initial_center: [f64; 2],
    pub basemap_url: String,
    pub basemap_attribution: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            layers_endpoint: "./get-wms-layers/".to_string(),
            plot_endpoint: "./get-time-series-plot/".to_string(),
            tile_proxy_endpoint: "./getWMSImageFromServer/".to_string(),
            use_tile_proxy: true,
            color_scale_range: [250.0, 350.0],
            num_color_bands: 100,
            initial_zoom: 3,
            initial_center: [0.0, 0.0],
            basemap_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            basemap_attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
        }
    }
}

impl ViewerConfig {
    /// localStorage key holding configuration overrides.
    pub const STORAGE_KEY: &'static str = "thredds_viewer_config";

    /// Parses a (possibly partial) JSON configuration.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The `colorscalerange` WMS parameter, e.g. `"250,350"`.
    pub fn color_scale_param(&self) -> String {
        let [min, max] = self.color_scale_range;
        format!("{},{}", min, max)
    }

    /// Load configuration from localStorage, falling back to defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return Self::default(),
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        let json = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        match Self::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded viewer config from localStorage");
                config
            }
            Err(e) => {
                log::warn!("Failed to parse viewer config: {}", e);
                Self::default()
            }
        }
    }

    /// Defaults only on native builds.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_color_scale_param() {
        assert_eq!(ViewerConfig::default().color_scale_param(), "250,350");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(
            r#"{"use_tile_proxy": false, "color_scale_range": [0.5, 40]}"#,
        )
        .unwrap();

        assert!(!config.use_tile_proxy);
        assert_eq!(config.color_scale_param(), "0.5,40");
        assert_eq!(config.layers_endpoint, "./get-wms-layers/");
        assert_eq!(config.num_color_bands, 100);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(ViewerConfig::from_json("{not json").is_err());
    }
}
