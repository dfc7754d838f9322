#![warn(clippy::all)]

//! THREDDS Map Workbench - browser controller for time-varying WMS layers.
//!
//! Keeps the page's dataset, variable and style selectors, the legend panel,
//! the loading indicator and a Leaflet map consistent with each other, and
//! plots time series for locations drawn on the map. Layer metadata, tiles and
//! plots come from the app's server endpoints.
//!
//! Everything except the browser bindings builds and is tested natively.

pub mod map;
pub mod services;
pub mod state;
pub mod sync;
pub mod ui;
pub mod wms;

#[cfg(target_arch = "wasm32")]
mod js;

#[cfg(target_arch = "wasm32")]
thread_local! {
    static BINDINGS: std::cell::RefCell<Option<ui::Bindings>> = const { std::cell::RefCell::new(None) };
}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    use std::cell::RefCell;
    use std::rc::Rc;

    console_error_panic_hook::set_once();
    // Redirect `log` messages to `console.log`:
    console_log::init_with_level(log::Level::Debug).ok();

    let config = state::ViewerConfig::load();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| wasm_bindgen::JsValue::from_str("No document"))?;

    let result = (|| -> Result<ui::Bindings, ui::BindError> {
        let map = map::LeafletMap::new(ui::ids::MAP, &config)?;
        let controls = ui::DomControls::new(document)?;
        let services = Rc::new(services::HttpServices::new(&config));
        let sync = Rc::new(RefCell::new(sync::MapSynchronizer::new(config, map, controls)));
        ui::bind(sync, services)
    })();

    match result {
        Ok(bindings) => {
            BINDINGS.with(|b| *b.borrow_mut() = Some(bindings));
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to start map viewer: {}", e);
            Err(wasm_bindgen::JsValue::from_str(&e.to_string()))
        }
    }
}

/// Unbinds every page handler. The map stays as it is.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn stop() {
    if BINDINGS.with(|b| b.borrow_mut().take()).is_some() {
        log::info!("Unbound map controls");
    }
}
