//! Leaflet implementation of [`MapAdapter`].
//!
//! Talks to the page's global `L` (Leaflet with the TimeDimension, Draw and
//! Fullscreen plugins) through `js_sys::Reflect`.

use super::MapAdapter;
use crate::js::{call_method, object};
use crate::state::{DrawnLocation, ViewerConfig};
use crate::ui::BindError;
use crate::wms::{BoundingBox, WmsLayerSpec};
use chrono::{DateTime, Utc};
use js_sys::{Array, Function, Reflect};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Tile activity reported by the active WMS layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEvent {
    /// A batch of tiles started loading
    Loading,
    /// All visible tiles finished loading
    Loaded,
}

/// A Leaflet event handler that is unregistered when dropped.
pub struct MapSubscription {
    target: JsValue,
    event: &'static str,
    closure: Closure<dyn FnMut(JsValue)>,
}

impl Drop for MapSubscription {
    fn drop(&mut self) {
        if let Err(e) = call_method(
            &self.target,
            "off",
            &[JsValue::from_str(self.event), self.closure.as_ref().clone()],
        ) {
            log::warn!("Failed to unsubscribe from {}: {:?}", self.event, e);
        }
    }
}

/// The Leaflet map in `#leaflet-map`.
pub struct LeafletMap {
    leaflet: JsValue,
    map: JsValue,
    /// Feature group holding the drawn location
    drawn_items: JsValue,
    /// Time-dimension wrapper of the active WMS layer
    td_layer: Option<JsValue>,
    /// Tile event handlers of the active WMS layer
    tile_subscriptions: Vec<MapSubscription>,
    tile_listener: Option<Rc<dyn Fn(TileEvent)>>,
}

impl LeafletMap {
    /// Creates the map with its basemap, time-dimension control and draw
    /// control.
    pub fn new(container_id: &str, config: &ViewerConfig) -> Result<Self, BindError> {
        let leaflet = Reflect::get(&js_sys::global(), &JsValue::from_str("L"))?;
        if leaflet.is_undefined() {
            return Err(BindError::MissingLibrary("Leaflet"));
        }

        let [lat, lng] = config.initial_center;
        let options = object(&[
            ("zoom", JsValue::from_f64(config.initial_zoom as f64)),
            ("center", lat_lng(lat, lng)),
            ("fullscreenControl", JsValue::TRUE),
            ("timeDimension", JsValue::TRUE),
            ("timeDimensionControl", JsValue::TRUE),
        ]);
        let map = call_method(&leaflet, "map", &[JsValue::from_str(container_id), options])?;

        let basemap_options = object(&[(
            "attribution",
            JsValue::from_str(&config.basemap_attribution),
        )]);
        let basemap = call_method(
            &leaflet,
            "tileLayer",
            &[JsValue::from_str(&config.basemap_url), basemap_options],
        )?;
        call_method(&basemap, "addTo", &[map.clone()])?;

        let drawn_items = call_method(&leaflet, "featureGroup", &[])?;
        call_method(&drawn_items, "addTo", &[map.clone()])?;
        add_draw_control(&leaflet, &map, &drawn_items)?;

        log::info!("Created Leaflet map in #{}", container_id);

        Ok(Self {
            leaflet,
            map,
            drawn_items,
            td_layer: None,
            tile_subscriptions: Vec::new(),
            tile_listener: None,
        })
    }

    /// Receives tile activity of every layer rendered from now on.
    pub fn set_tile_listener(&mut self, listener: Rc<dyn Fn(TileEvent)>) {
        self.tile_listener = Some(listener);
    }

    /// Calls `handler` with the location of every completed marker draw.
    pub fn on_draw(
        &self,
        handler: impl Fn(DrawnLocation) + 'static,
    ) -> Result<MapSubscription, BindError> {
        let closure = Closure::wrap(Box::new(move |event: JsValue| {
            match drawn_location(&event) {
                Some(location) => handler(location),
                None => log::warn!("Ignoring draw event without a point location"),
            }
        }) as Box<dyn FnMut(JsValue)>);

        Ok(subscribe(&self.map, "draw:created", closure)?)
    }

    fn try_render_layer(&mut self, spec: &WmsLayerSpec) -> Result<(), JsValue> {
        let options = serde_wasm_bindgen::to_value(spec)?;
        let tile_layer = Reflect::get(&self.leaflet, &JsValue::from_str("tileLayer"))?;
        let wms_layer = call_method(&tile_layer, "wms", &[JsValue::from_str(&spec.url), options])?;

        if let Some(listener) = &self.tile_listener {
            for (event, kind) in [("loading", TileEvent::Loading), ("load", TileEvent::Loaded)] {
                let listener = listener.clone();
                let closure = Closure::wrap(
                    Box::new(move |_: JsValue| listener(kind)) as Box<dyn FnMut(JsValue)>
                );
                self.tile_subscriptions
                    .push(subscribe(&wms_layer, event, closure)?);
            }
        }

        let time_dimension = Reflect::get(&self.leaflet, &JsValue::from_str("timeDimension"))?;
        let td_layers = Reflect::get(&time_dimension, &JsValue::from_str("layer"))?;
        let td_options = object(&[("updateTimeDimension", JsValue::TRUE)]);
        let td_layer = call_method(&td_layers, "wms", &[wms_layer, td_options])?;
        call_method(&td_layer, "addTo", &[self.map.clone()])?;

        self.td_layer = Some(td_layer);
        Ok(())
    }

    fn try_available_times(&self) -> Result<Vec<DateTime<Utc>>, JsValue> {
        let time_dimension = Reflect::get(&self.map, &JsValue::from_str("timeDimension"))?;
        if time_dimension.is_undefined() {
            return Ok(Vec::new());
        }
        let times: Array = call_method(&time_dimension, "getAvailableTimes", &[])?.dyn_into()?;

        let mut times: Vec<_> = times
            .iter()
            .filter_map(|t| t.as_f64())
            .filter_map(|ms| DateTime::from_timestamp_millis(ms as i64))
            .collect();
        times.sort();
        Ok(times)
    }
}

impl MapAdapter for LeafletMap {
    fn render_layer(&mut self, spec: &WmsLayerSpec) {
        if let Err(e) = self.try_render_layer(spec) {
            log::error!("Failed to render WMS layer {}: {:?}", spec.layers, e);
        }
    }

    fn clear_layer(&mut self) {
        self.tile_subscriptions.clear();
        if let Some(td_layer) = self.td_layer.take() {
            if let Err(e) = call_method(&self.map, "removeLayer", &[td_layer]) {
                log::warn!("Failed to remove WMS layer: {:?}", e);
            }
        }
    }

    fn fit_bounds(&mut self, bbox: &BoundingBox) {
        let [[south, west], [north, east]] = bbox.corners();
        let bounds = Array::of2(&lat_lng(south, west), &lat_lng(north, east));
        if let Err(e) = call_method(&self.map, "fitBounds", &[bounds.into()]) {
            log::warn!("Failed to fit bounds: {:?}", e);
        }
    }

    fn available_times(&self) -> Vec<DateTime<Utc>> {
        self.try_available_times().unwrap_or_else(|e| {
            log::warn!("Failed to read available times: {:?}", e);
            Vec::new()
        })
    }

    fn clear_drawn_items(&mut self) {
        if let Err(e) = call_method(&self.drawn_items, "clearLayers", &[]) {
            log::warn!("Failed to clear drawn items: {:?}", e);
        }
    }

    fn add_drawn_item(&mut self, location: &DrawnLocation) {
        let result = call_method(
            &self.leaflet,
            "marker",
            &[lat_lng(location.lat(), location.lng())],
        )
        .and_then(|marker| call_method(&self.drawn_items, "addLayer", &[marker]));
        if let Err(e) = result {
            log::warn!("Failed to show drawn location: {:?}", e);
        }
    }
}

/// Adds a draw control that only offers markers.
fn add_draw_control(leaflet: &JsValue, map: &JsValue, drawn_items: &JsValue) -> Result<(), JsValue> {
    let draw = object(&[
        ("polyline", JsValue::FALSE),
        ("polygon", JsValue::FALSE),
        ("rectangle", JsValue::FALSE),
        ("circle", JsValue::FALSE),
        ("circlemarker", JsValue::FALSE),
        ("marker", JsValue::TRUE),
    ]);
    let edit = object(&[
        ("featureGroup", drawn_items.clone()),
        ("edit", JsValue::FALSE),
        ("remove", JsValue::FALSE),
    ]);
    let options = object(&[("draw", draw), ("edit", edit)]);

    let control = Reflect::get(leaflet, &JsValue::from_str("Control"))?;
    let draw_ctor: Function = Reflect::get(&control, &JsValue::from_str("Draw"))?.dyn_into()?;
    let draw_control = Reflect::construct(&draw_ctor, &Array::of1(&options))?;
    call_method(map, "addControl", &[draw_control])?;
    Ok(())
}

/// Reads `event.layer.getLatLng()` of a `draw:created` event.
fn drawn_location(event: &JsValue) -> Option<DrawnLocation> {
    let layer = Reflect::get(event, &JsValue::from_str("layer")).ok()?;
    let lat_lng = call_method(&layer, "getLatLng", &[]).ok()?;
    let lat = Reflect::get(&lat_lng, &JsValue::from_str("lat")).ok()?.as_f64()?;
    let lng = Reflect::get(&lat_lng, &JsValue::from_str("lng")).ok()?.as_f64()?;
    Some(DrawnLocation::from_lat_lng(lat, lng))
}

fn subscribe(
    target: &JsValue,
    event: &'static str,
    closure: Closure<dyn FnMut(JsValue)>,
) -> Result<MapSubscription, JsValue> {
    call_method(
        target,
        "on",
        &[JsValue::from_str(event), closure.as_ref().clone()],
    )?;
    Ok(MapSubscription {
        target: target.clone(),
        event,
        closure,
    })
}

fn lat_lng(lat: f64, lng: f64) -> JsValue {
    Array::of2(&JsValue::from_f64(lat), &JsValue::from_f64(lng)).into()
}
