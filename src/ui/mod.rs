//! Page controls bound to the synchronizer.
//!
//! [`ControlSurface`] is everything the synchronizer writes to outside the
//! map: the cascading selectors, the legend panel, the loader and the plot
//! modal. On wasm32, `dom` implements it over the page's elements and
//! `bindings` wires the page's events back into the synchronizer.

#[cfg(target_arch = "wasm32")]
mod bindings;
#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
pub use bindings::{bind, BindError, Bindings};
#[cfg(target_arch = "wasm32")]
pub use dom::DomControls;

use crate::state::DatasetOption;

/// Markup shown in the plot modal while a plot is being rendered.
pub const PLOT_LOADING_HTML: &str =
    r#"<div class="plot-loading"><div class="spinner-border" role="status"></div><span>Loading plot...</span></div>"#;

/// Element IDs of the page controls.
pub mod ids {
    pub const DATASET: &str = "dataset";
    pub const VARIABLE: &str = "variable";
    pub const STYLE: &str = "style";
    pub const LEGEND: &str = "legend";
    pub const LOADER: &str = "loader";
    pub const PLOT_CONTAINER: &str = "plot-container";
    pub const PLOT_MODAL: &str = "plot-modal";
    pub const VERTICAL_LEVEL: &str = "vertical_level";
    pub const MAP: &str = "leaflet-map";
}

/// UI surfaces kept consistent with the current selection.
pub trait ControlSurface {
    /// Shows `dataset` as the dataset selector's current option.
    fn set_dataset(&mut self, dataset: &DatasetOption);

    /// Replaces the variable selector's options.
    fn set_variable_options(&mut self, names: &[String], selected: Option<&str>);

    /// Replaces the style selector's options.
    fn set_style_options(&mut self, names: &[String], selected: Option<&str>);

    /// Shows the legend graphic, or clears the panel when `None`.
    fn set_legend(&mut self, legend_url: Option<&str>);

    fn set_loading(&mut self, visible: bool);

    /// Opens the plot modal with the loading placeholder.
    fn open_plot_modal(&mut self);

    /// Replaces the plot modal's content with rendered markup.
    fn set_plot_content(&mut self, html: &str);

    /// Vertical level entered in the form, if any.
    fn vertical_level(&self) -> Option<String>;
}
