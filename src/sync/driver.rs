//! Async drivers for the synchronizer's suspension points.

use super::{MapSynchronizer, SyncError};
use crate::map::MapAdapter;
use crate::services::{LayerService, PlotService};
use crate::state::{DatasetOption, DrawnLocation};
use crate::ui::ControlSurface;
use std::cell::RefCell;
use std::rc::Rc;

/// The synchronizer as shared between event handlers on the UI thread.
pub type SharedSynchronizer<M, U> = Rc<RefCell<MapSynchronizer<M, U>>>;

/// Selects `dataset`, fetches its layers and runs the rest of the cascade.
///
/// The synchronizer is not borrowed while the fetch is pending, so other
/// events can be handled in the meantime; if one of them starts a newer
/// fetch, this one's result is discarded as stale.
pub async fn change_dataset<M, U, S>(
    sync: &SharedSynchronizer<M, U>,
    service: &S,
    dataset: DatasetOption,
) -> Result<(), SyncError>
where
    M: MapAdapter,
    U: ControlSurface,
    S: LayerService,
{
    let request = sync.borrow_mut().select_dataset(dataset);
    let result = service.fetch_layers(&request.dataset.wms_url).await;
    sync.borrow_mut().apply_layers(request.generation, result)
}

/// Replaces the drawn location and shows its time series in the plot modal.
pub async fn plot_location<M, U, S>(
    sync: &SharedSynchronizer<M, U>,
    service: &S,
    location: DrawnLocation,
) -> Result<(), SyncError>
where
    M: MapAdapter,
    U: ControlSurface,
    S: PlotService,
{
    let pending = sync.borrow_mut().begin_plot(location)?;
    let result = service.fetch_plot(&pending.request).await;
    sync.borrow_mut().apply_plot(pending.generation, result)
}
