//! Wires page events into the synchronizer.

use super::DomControls;
use crate::js::{call_method, jquery};
use crate::map::{LeafletMap, MapSubscription, TileEvent};
use crate::services::{LayerService, PlotService};
use crate::state::DatasetOption;
use crate::sync::{change_dataset, plot_location, MapSynchronizer, SyncError};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlSelectElement;

type Synchronizer = RefCell<MapSynchronizer<LeafletMap, DomControls>>;

/// Errors while setting up the page.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BindError {
    #[error("Element #{0} not found")]
    MissingElement(&'static str),
    #[error("Element #{0} has an unexpected type")]
    WrongElementType(&'static str),
    #[error("{0} is not loaded")]
    MissingLibrary(&'static str),
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for BindError {
    fn from(value: JsValue) -> Self {
        BindError::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

/// A change listener on one of the selectors.
///
/// Registered through jQuery when it is loaded, since select2 only raises
/// jQuery events; otherwise as a plain DOM listener.
struct SelectListener {
    select: HtmlSelectElement,
    via_jquery: bool,
    closure: Closure<dyn FnMut(JsValue)>,
}

impl SelectListener {
    fn new(select: &HtmlSelectElement, handler: impl Fn(String) + 'static) -> Result<Self, BindError> {
        let target = select.clone();
        let closure = Closure::wrap(Box::new(move |_: JsValue| handler(target.value()))
            as Box<dyn FnMut(JsValue)>);

        let via_jquery = match jquery(select) {
            Some(wrapped) => {
                call_method(&wrapped, "on", &[JsValue::from_str("change"), closure.as_ref().clone()])?;
                true
            }
            None => {
                select
                    .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
                false
            }
        };

        Ok(Self {
            select: select.clone(),
            via_jquery,
            closure,
        })
    }
}

impl Drop for SelectListener {
    fn drop(&mut self) {
        if self.via_jquery {
            if let Some(wrapped) = jquery(&self.select) {
                if let Err(e) = call_method(
                    &wrapped,
                    "off",
                    &[JsValue::from_str("change"), self.closure.as_ref().clone()],
                ) {
                    log::warn!("Failed to unbind select listener: {:?}", e);
                }
            }
        } else if let Err(e) = self
            .select
            .remove_event_listener_with_callback("change", self.closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to unbind select listener: {:?}", e);
        }
    }
}

/// Live event bindings. Dropping this unregisters every handler.
pub struct Bindings {
    _selects: Vec<SelectListener>,
    _draw: MapSubscription,
}

/// Binds the selectors, tile events and draw events, then loads the
/// initially selected dataset.
pub fn bind<S>(sync: Rc<Synchronizer>, services: Rc<S>) -> Result<Bindings, BindError>
where
    S: LayerService + PlotService + 'static,
{
    let weak = Rc::downgrade(&sync);

    sync.borrow_mut()
        .map_mut()
        .set_tile_listener(Rc::new(tile_listener(weak.clone())));

    let (dataset_select, variable_select, style_select) = {
        let sync = sync.borrow();
        let ui = sync.ui();
        (
            ui.dataset_select().clone(),
            ui.variable_select().clone(),
            ui.style_select().clone(),
        )
    };

    let dataset_listener = {
        let weak = weak.clone();
        let services = services.clone();
        SelectListener::new(&dataset_select, move |value| {
            load_dataset(&weak, &services, &value)
        })?
    };

    let variable_listener = {
        let weak = weak.clone();
        SelectListener::new(&variable_select, move |value| {
            if let Some(sync) = weak.upgrade() {
                report(sync.borrow_mut().select_variable(&value));
            }
        })?
    };

    let style_listener = {
        let weak = weak.clone();
        SelectListener::new(&style_select, move |value| {
            if let Some(sync) = weak.upgrade() {
                report(sync.borrow_mut().select_style(&value));
            }
        })?
    };

    let draw = {
        let weak = weak.clone();
        let services = services.clone();
        sync.borrow().map().on_draw(move |location| {
            let weak = weak.clone();
            let services = services.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Some(sync) = weak.upgrade() {
                    report(plot_location(&sync, services.as_ref(), location).await);
                }
            });
        })?
    };

    log::info!("Bound map controls");
    load_dataset(&weak, &services, &dataset_select.value());

    Ok(Bindings {
        _selects: vec![dataset_listener, variable_listener, style_listener],
        _draw: draw,
    })
}

fn load_dataset<S>(weak: &Weak<Synchronizer>, services: &Rc<S>, value: &str)
where
    S: LayerService + 'static,
{
    let Some(dataset) = DatasetOption::parse(value) else {
        log::warn!("Ignoring malformed dataset option: {:?}", value);
        return;
    };
    let weak = weak.clone();
    let services = services.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let Some(sync) = weak.upgrade() {
            report(change_dataset(&sync, services.as_ref(), dataset).await);
        }
    });
}

/// Forwards tile events once the current borrow of the synchronizer ends.
///
/// Leaflet fires `loading` synchronously while the layer is being added, i.e.
/// while the synchronizer is mutably borrowed.
fn tile_listener(weak: Weak<Synchronizer>) -> impl Fn(TileEvent) {
    move |event| {
        let weak = weak.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(sync) = weak.upgrade() {
                sync.borrow_mut()
                    .tiles_loading(event == TileEvent::Loading);
            }
        });
    }
}

fn report(result: Result<(), SyncError>) {
    match result {
        Ok(()) => {}
        Err(SyncError::Stale { .. }) => {}
        Err(SyncError::Fetch(_)) => {}
        Err(e) => log::warn!("{}", e),
    }
}
