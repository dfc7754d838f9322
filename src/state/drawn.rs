//! The user-drawn plot location.

use geo_types::Point;
use geojson::{Feature, FeatureCollection, Geometry, Value};

/// A point drawn on the map, in WGS84 degrees.
///
/// At most one is held at a time; a new draw replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnLocation {
    point: Point<f64>,
}

impl DrawnLocation {
    /// Creates a location from Leaflet's (lat, lng) order.
    pub fn from_lat_lng(lat: f64, lng: f64) -> Self {
        Self {
            point: Point::new(lng, lat),
        }
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lng(&self) -> f64 {
        self.point.x()
    }

    /// Serializes the location the way the draw layer exports it: a feature
    /// collection holding one point feature.
    pub fn to_geojson(&self) -> String {
        let geometry = Geometry::new(Value::from(&self.point));
        let collection = FeatureCollection {
            bbox: None,
            features: vec![Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(serde_json::Map::new()),
                foreign_members: None,
            }],
            foreign_members: None,
        };
        serde_json::to_string(&collection).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_order() {
        let location = DrawnLocation::from_lat_lng(40.5, -111.25);
        assert_eq!(location.lat(), 40.5);
        assert_eq!(location.lng(), -111.25);
    }

    #[test]
    fn test_geojson_uses_lng_lat_coordinates() {
        let location = DrawnLocation::from_lat_lng(40.5, -111.25);
        let json: serde_json::Value = serde_json::from_str(&location.to_geojson()).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        let geometry = &json["features"][0]["geometry"];
        assert_eq!(geometry["type"], "Point");
        assert_eq!(geometry["coordinates"][0], -111.25);
        assert_eq!(geometry["coordinates"][1], 40.5);
    }
}
