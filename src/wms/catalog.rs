//! Layer catalog returned by the `get-wms-layers` endpoint.

use crate::services::FetchError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Geographic extent of a layer as `[[south, west], [north, east]]`.
///
/// Corners are in Leaflet's (lat, lng) order, as the server converts them
/// from the layer's WGS84 bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundingBox {
    corners: [[f64; 2]; 2],
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            corners: [[south, west], [north, east]],
        }
    }

    pub fn south(&self) -> f64 {
        self.corners[0][0]
    }

    pub fn north(&self) -> f64 {
        self.corners[1][0]
    }

    /// Corners as `[[lat, lng], [lat, lng]]`, ready for `fitBounds`.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        self.corners
    }

    /// True if all coordinates are finite and south does not exceed north.
    pub fn is_valid(&self) -> bool {
        self.corners.iter().flatten().all(|c| c.is_finite()) && self.south() <= self.north()
    }
}

/// Metadata for one style of a layer.
///
/// Servers only report a legend when the WMS advertises a LegendURL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleInfo {
    /// URL of the legend graphic for this style
    #[serde(default)]
    pub legend: Option<String>,
}

/// Metadata for one WMS layer (one variable of the dataset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub bbox: BoundingBox,
    /// Styles in server order
    #[serde(default)]
    pub styles: IndexMap<String, StyleInfo>,
}

impl LayerInfo {
    pub fn style_names(&self) -> Vec<String> {
        self.styles.keys().cloned().collect()
    }

    pub fn first_style(&self) -> Option<&str> {
        self.styles.keys().next().map(String::as_str)
    }

    pub fn has_style(&self, style: &str) -> bool {
        self.styles.contains_key(style)
    }

    pub fn legend_for(&self, style: &str) -> Option<&str> {
        self.styles.get(style).and_then(|s| s.legend.as_deref())
    }
}

/// All layers of a WMS endpoint, keyed by variable name in server order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerCatalog {
    layers: IndexMap<String, LayerInfo>,
}

impl LayerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn get(&self, variable: &str) -> Option<&LayerInfo> {
        self.layers.get(variable)
    }

    pub fn variable_names(&self) -> Vec<String> {
        self.layers.keys().cloned().collect()
    }

    pub fn first_variable(&self) -> Option<&str> {
        self.layers.keys().next().map(String::as_str)
    }
}

/// Raw JSON body of the `get-wms-layers` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LayersResponse {
    pub success: bool,
    #[serde(default)]
    pub layers: Option<LayerCatalog>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LayersResponse {
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Converts the response into a usable catalog.
    ///
    /// A response reporting failure, or one without any layers, is an error.
    pub fn into_catalog(self) -> Result<LayerCatalog, FetchError> {
        if !self.success {
            return Err(FetchError::Reported(self.error));
        }
        match self.layers {
            Some(catalog) if !catalog.is_empty() => Ok(catalog),
            _ => Err(FetchError::EmptyCatalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RESPONSE: &str = r#"{
        "success": true,
        "layers": {
            "temp": {
                "bbox": [[0, 0], [10, 10]],
                "styles": {
                    "default": {"legend": "/legend/temp.png"},
                    "boxfill/rainbow": {"legend": "/legend/temp-rainbow.png"}
                }
            },
            "precip": {
                "bbox": [[-90, -180], [90, 180]],
                "styles": {}
            }
        }
    }"#;

    #[test]
    fn test_decode_preserves_server_order() {
        let catalog = LayersResponse::from_json(RESPONSE)
            .unwrap()
            .into_catalog()
            .unwrap();

        assert_eq!(catalog.variable_names(), vec!["temp", "precip"]);
        assert_eq!(catalog.first_variable(), Some("temp"));

        let temp = catalog.get("temp").unwrap();
        assert_eq!(temp.style_names(), vec!["default", "boxfill/rainbow"]);
        assert_eq!(temp.first_style(), Some("default"));
        assert_eq!(temp.legend_for("boxfill/rainbow"), Some("/legend/temp-rainbow.png"));
        assert_eq!(temp.bbox, BoundingBox::new(0.0, 0.0, 10.0, 10.0));

        assert_eq!(catalog.get("precip").unwrap().first_style(), None);
    }

    #[test]
    fn test_style_without_legend_decodes() {
        let catalog = LayersResponse::from_json(
            r#"{"success": true, "layers": {"temp": {
                "bbox": [[0, 0], [1, 1]],
                "styles": {
                    "boxfill/rainbow": {"title": "boxfill/rainbow"},
                    "boxfill/ncview": {"legend": "/legend/temp-ncview.png"}
                }
            }}}"#,
        )
        .unwrap()
        .into_catalog()
        .unwrap();

        let temp = catalog.get("temp").unwrap();
        assert_eq!(temp.style_names(), vec!["boxfill/rainbow", "boxfill/ncview"]);
        assert!(temp.has_style("boxfill/rainbow"));
        assert_eq!(temp.legend_for("boxfill/rainbow"), None);
        assert_eq!(temp.legend_for("boxfill/ncview"), Some("/legend/temp-ncview.png"));
    }

    #[test]
    fn test_reported_failure_carries_message() {
        let response = LayersResponse::from_json(
            r#"{"success": false, "error": "An unexpected error has occurred."}"#,
        )
        .unwrap();

        match response.into_catalog() {
            Err(FetchError::Reported(Some(message))) => {
                assert_eq!(message, "An unexpected error has occurred.")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_success_without_layers_is_empty() {
        let response = LayersResponse::from_json(r#"{"success": true, "layers": {}}"#).unwrap();
        assert!(matches!(
            response.into_catalog(),
            Err(FetchError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_undecodable_body() {
        assert!(matches!(
            LayersResponse::from_json("<html>"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_bounding_box_accessors() {
        let bbox = BoundingBox::new(-10.0, 20.0, 30.0, 60.0);
        assert_eq!(bbox.south(), -10.0);
        assert_eq!(bbox.north(), 30.0);
        assert_eq!(bbox.corners(), [[-10.0, 20.0], [30.0, 60.0]]);
        assert!(bbox.is_valid());
        assert!(!BoundingBox::new(30.0, 0.0, -10.0, 1.0).is_valid());
        assert!(!BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
    }
}
