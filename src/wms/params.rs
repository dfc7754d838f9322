//! Tile request parameters for the time-aware WMS layer.

use crate::state::ViewerConfig;
use serde::Serialize;
use url::form_urlencoded;

/// Everything the map adapter needs to put a WMS layer on the map.
///
/// Field names match the WMS query parameters so the struct can be handed to
/// Leaflet's `tileLayer.wms` as its options object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WmsLayerSpec {
    /// Base URL tiles are requested from (direct WMS or proxy)
    #[serde(skip)]
    pub url: String,
    pub layers: String,
    /// Empty for the server's default style
    pub styles: String,
    pub format: &'static str,
    pub transparent: bool,
    pub colorscalerange: String,
    pub numcolorbands: u32,
    pub abovemaxcolor: &'static str,
    pub belowmincolor: &'static str,
}

impl WmsLayerSpec {
    /// Builds the layer for `variable`/`style` of the dataset at `wms_url`.
    pub fn new(wms_url: &str, variable: &str, style: Option<&str>, config: &ViewerConfig) -> Self {
        Self {
            url: tile_url(wms_url, config),
            layers: variable.to_string(),
            styles: style.unwrap_or_default().to_string(),
            format: "image/png",
            transparent: true,
            colorscalerange: config.color_scale_param(),
            numcolorbands: config.num_color_bands,
            abovemaxcolor: "extend",
            belowmincolor: "extend",
        }
    }

    /// WMS parameters in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("layers", self.layers.clone()),
            ("styles", self.styles.clone()),
            ("format", self.format.to_string()),
            ("transparent", self.transparent.to_string()),
            ("colorscalerange", self.colorscalerange.clone()),
            ("numcolorbands", self.numcolorbands.to_string()),
            ("abovemaxcolor", self.abovemaxcolor.to_string()),
            ("belowmincolor", self.belowmincolor.to_string()),
        ]
    }
}

/// Base tile URL for a dataset.
///
/// With the proxy enabled the WMS URL is passed, url-encoded, as `main_url`.
pub fn tile_url(wms_url: &str, config: &ViewerConfig) -> String {
    if !config.use_tile_proxy {
        return wms_url.to_string();
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("main_url", wms_url)
        .finish();
    let separator = if config.tile_proxy_endpoint.contains('?') {
        '&'
    } else {
        '?'
    };
    format!("{}{}{}", config.tile_proxy_endpoint, separator, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_layer_spec_defaults() {
        let config = ViewerConfig::default();
        let spec = WmsLayerSpec::new("http://example/wms", "temp", Some("default"), &config);

        assert_eq!(
            spec.query_pairs(),
            vec![
                ("layers", "temp".to_string()),
                ("styles", "default".to_string()),
                ("format", "image/png".to_string()),
                ("transparent", "true".to_string()),
                ("colorscalerange", "250,350".to_string()),
                ("numcolorbands", "100".to_string()),
                ("abovemaxcolor", "extend".to_string()),
                ("belowmincolor", "extend".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_style_requests_server_default() {
        let spec = WmsLayerSpec::new("http://example/wms", "temp", None, &ViewerConfig::default());
        assert_eq!(spec.styles, "");
    }

    #[test]
    fn test_proxied_tile_url_encodes_wms_url() {
        let config = ViewerConfig::default();
        assert_eq!(
            tile_url("http://example/thredds/wms/gfs.nc?service=WMS", &config),
            "./getWMSImageFromServer/?main_url=http%3A%2F%2Fexample%2Fthredds%2Fwms%2Fgfs.nc%3Fservice%3DWMS"
        );
    }

    #[test]
    fn test_direct_tile_url() {
        let config = ViewerConfig {
            use_tile_proxy: false,
            ..ViewerConfig::default()
        };
        assert_eq!(tile_url("http://example/wms", &config), "http://example/wms");
    }

    #[test]
    fn test_options_serialize_without_url() {
        let spec = WmsLayerSpec::new("http://example/wms", "temp", Some("default"), &ViewerConfig::default());
        let json = serde_json::to_value(&spec).unwrap();
        assert!(json.get("url").is_none());
        assert_eq!(json["numcolorbands"], 100);
        assert_eq!(json["transparent"], true);
    }
}
