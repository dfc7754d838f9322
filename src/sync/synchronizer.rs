//! Dataset → variable → style → layer cascade.

use super::{Generation, LayersRequest, PendingPlot, SyncError};
use crate::map::MapAdapter;
use crate::services::{FetchError, PlotRequest};
use crate::state::{
    CascadeStage, DatasetOption, DrawnLocation, LoadingTracker, Selection, ViewerConfig,
};
use crate::ui::ControlSurface;
use crate::wms::{LayerCatalog, WmsLayerSpec};

/// Keeps the selectors, legend, loader and map layer consistent with the
/// user's selection.
///
/// Each asynchronous flow is split in two: a `select_*`/`begin_*` call that
/// issues a request and a matching `apply_*` call for its completion. Only the
/// completion of the latest request is applied.
///
/// The selected dataset only changes once its catalog has loaded. Until then,
/// variable and style changes and draws keep working against the dataset
/// already on the map.
pub struct MapSynchronizer<M, U> {
    config: ViewerConfig,
    map: M,
    ui: U,
    /// Always refers to `catalog`
    selection: Selection,
    catalog: LayerCatalog,
    /// Dataset change waiting for its catalog
    pending: Option<LayersRequest>,
    stage: CascadeStage,
    loading: LoadingTracker,
    drawn: Option<DrawnLocation>,
    layers_generation: Generation,
    plot_generation: Generation,
}

impl<M: MapAdapter, U: ControlSurface> MapSynchronizer<M, U> {
    pub fn new(config: ViewerConfig, map: M, ui: U) -> Self {
        Self {
            config,
            map,
            ui,
            selection: Selection::default(),
            catalog: LayerCatalog::new(),
            pending: None,
            stage: CascadeStage::Idle,
            loading: LoadingTracker::new(),
            drawn: None,
            layers_generation: Generation::default(),
            plot_generation: Generation::default(),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    /// `DatasetSelected` while a dataset change is waiting for its catalog,
    /// otherwise how far the current selection has progressed.
    pub fn stage(&self) -> CascadeStage {
        if self.pending.is_some() {
            CascadeStage::DatasetSelected
        } else {
            self.stage
        }
    }

    /// Dataset whose catalog is being fetched, if any.
    pub fn pending_dataset(&self) -> Option<&DatasetOption> {
        self.pending.as_ref().map(|request| &request.dataset)
    }

    pub fn drawn(&self) -> Option<&DrawnLocation> {
        self.drawn.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_visible()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    /// Issues a layer catalog request for `dataset`.
    ///
    /// The dataset becomes current once [`apply_layers`](Self::apply_layers)
    /// accepts its catalog. Any request still in flight becomes stale.
    pub fn select_dataset(&mut self, dataset: DatasetOption) -> LayersRequest {
        log::info!("Dataset selected: {}", dataset);

        self.layers_generation = self.layers_generation.next();
        let request = LayersRequest {
            generation: self.layers_generation,
            dataset,
        };
        self.pending = Some(request.clone());
        self.set_metadata_pending(true);

        request
    }

    /// Applies the completion of a layer catalog request.
    ///
    /// On failure the selection, layer and cached catalog are left as they
    /// were and the dataset selector goes back to the loaded dataset.
    pub fn apply_layers(
        &mut self,
        generation: Generation,
        result: Result<LayerCatalog, FetchError>,
    ) -> Result<(), SyncError> {
        let dataset = match self.pending.take() {
            Some(request) if request.generation == generation => request.dataset,
            pending => {
                self.pending = pending;
                log::debug!(
                    "Ignoring stale layer response ({} superseded by {})",
                    generation,
                    self.layers_generation
                );
                return Err(SyncError::Stale {
                    received: generation,
                    latest: self.layers_generation,
                });
            }
        };
        self.set_metadata_pending(false);

        let catalog = match result {
            Ok(catalog) => catalog,
            Err(e) => return Err(self.reject_layers(&dataset, e)),
        };
        let Some(first) = catalog.first_variable().map(str::to_string) else {
            return Err(self.reject_layers(&dataset, FetchError::EmptyCatalog));
        };

        let names = catalog.variable_names();
        log::info!("Loaded {} layer(s) for {}", names.len(), dataset.name);

        self.catalog = catalog;
        self.selection = Selection {
            dataset: Some(dataset),
            variable: None,
            style: None,
        };
        self.ui.set_variable_options(&names, Some(&first));
        self.stage = CascadeStage::VariablesLoaded;

        self.select_variable(&first)
    }

    /// Makes `variable` current, rebuilds the style selector, refits the map
    /// and selects the variable's first style.
    pub fn select_variable(&mut self, variable: &str) -> Result<(), SyncError> {
        if self.catalog.is_empty() {
            return Err(SyncError::CatalogNotLoaded);
        }
        let (styles, bbox) = match self.catalog.get(variable) {
            Some(info) => (info.style_names(), info.bbox),
            None => return Err(SyncError::UnknownVariable(variable.to_string())),
        };

        log::info!("Variable selected: {}", variable);
        self.selection.variable = Some(variable.to_string());
        self.selection.style = None;
        self.stage = CascadeStage::VariableSelected;

        let first_style = styles.first().cloned();
        self.ui.set_style_options(&styles, first_style.as_deref());
        self.stage = CascadeStage::StylesBuilt;

        if bbox.is_valid() {
            self.map.fit_bounds(&bbox);
        } else {
            log::warn!("Not refitting to invalid bounds of {}: {:?}", variable, bbox);
        }

        match first_style {
            Some(style) => self.select_style(&style),
            None => {
                log::warn!("Variable {} has no styles, using server default", variable);
                self.stage = CascadeStage::StyleSelected;
                self.render_layer();
                Ok(())
            }
        }
    }

    /// Makes `style` current and re-renders the layer and legend.
    pub fn select_style(&mut self, style: &str) -> Result<(), SyncError> {
        let Some(variable) = self.selection.variable.clone() else {
            return Err(SyncError::NoVariableSelected);
        };
        let known = self
            .catalog
            .get(&variable)
            .is_some_and(|info| info.has_style(style));
        if !known {
            return Err(SyncError::UnknownStyle {
                variable,
                style: style.to_string(),
            });
        }

        log::info!("Style selected: {}", style);
        self.selection.style = Some(style.to_string());
        self.stage = CascadeStage::StyleSelected;
        self.render_layer();
        Ok(())
    }

    /// Starts or finishes the active tile batch.
    pub fn tiles_loading(&mut self, loading: bool) {
        if self.loading.set_tiles_pending(loading) {
            self.ui.set_loading(self.loading.is_visible());
        }
    }

    /// Replaces the drawn location and issues a time-series request for it.
    ///
    /// The plot modal is opened with its loading placeholder. Drawing before a
    /// layer is on the map is rejected without touching the overlay.
    pub fn begin_plot(&mut self, location: DrawnLocation) -> Result<PendingPlot, SyncError> {
        let (Some(dataset), Some(variable)) =
            (self.selection.dataset_name(), self.selection.variable())
        else {
            return Err(SyncError::NoActiveLayer);
        };
        if self.stage != CascadeStage::LayerRendered {
            log::debug!("Ignoring draw at stage '{}'", self.stage.label());
            return Err(SyncError::NoActiveLayer);
        }
        let dataset = dataset.to_string();
        let variable = variable.to_string();

        log::info!(
            "Location drawn at ({:.4}, {:.4})",
            location.lat(),
            location.lng()
        );

        self.map.clear_drawn_items();
        self.map.add_drawn_item(&location);
        self.drawn = Some(location);
        self.ui.open_plot_modal();

        let times = self.map.available_times();
        let vertical_level = self
            .ui
            .vertical_level()
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty());

        self.plot_generation = self.plot_generation.next();

        Ok(PendingPlot {
            generation: self.plot_generation,
            request: PlotRequest {
                geometry: location.to_geojson(),
                variable,
                dataset,
                start_time: times.iter().min().copied(),
                end_time: times.iter().max().copied(),
                vertical_level,
            },
        })
    }

    /// Applies the completion of a time-series request.
    ///
    /// On failure the modal keeps its loading placeholder.
    pub fn apply_plot(
        &mut self,
        generation: Generation,
        result: Result<String, FetchError>,
    ) -> Result<(), SyncError> {
        if generation != self.plot_generation {
            log::debug!(
                "Ignoring stale plot response ({} superseded by {})",
                generation,
                self.plot_generation
            );
            return Err(SyncError::Stale {
                received: generation,
                latest: self.plot_generation,
            });
        }

        match result {
            Ok(html) => {
                self.ui.set_plot_content(&html);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to render time series: {}", e);
                Err(e.into())
            }
        }
    }

    fn reject_layers(&mut self, dataset: &DatasetOption, error: FetchError) -> SyncError {
        log::error!("Failed to load layers for {}: {}", dataset.name, error);

        if let Some(loaded) = &self.selection.dataset {
            self.ui.set_dataset(loaded);
        }
        error.into()
    }

    /// Replaces the map layer and legend with ones for the current selection.
    fn render_layer(&mut self) {
        let (Some(wms_url), Some(variable)) = (self.selection.wms_url(), self.selection.variable())
        else {
            return;
        };
        let style = self.selection.style();

        self.map.clear_layer();
        // The removed layer reports no more tile events.
        if self.loading.set_tiles_pending(false) {
            self.ui.set_loading(self.loading.is_visible());
        }
        self.ui.set_legend(None);
        self.map.clear_drawn_items();
        self.drawn = None;

        let spec = WmsLayerSpec::new(wms_url, variable, style, &self.config);
        log::debug!("Rendering {} ({}) from {}", spec.layers, spec.styles, spec.url);
        self.map.render_layer(&spec);

        let legend = style.and_then(|s| {
            self.catalog
                .get(variable)
                .and_then(|info| info.legend_for(s))
        });
        if let Some(legend) = legend {
            self.ui.set_legend(Some(legend));
        }

        self.stage = CascadeStage::LayerRendered;
    }

    fn set_metadata_pending(&mut self, pending: bool) {
        if self.loading.set_metadata_pending(pending) {
            self.ui.set_loading(self.loading.is_visible());
        }
    }
}
