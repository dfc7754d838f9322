//! Browser HTTP implementation of the viewer services.

use super::{FetchError, LayerService, PlotRequest, PlotService};
use crate::state::ViewerConfig;
use crate::wms::{LayerCatalog, LayersResponse};
use gloo_net::http::{Request, Response};

/// Calls the app's REST endpoints with `fetch`.
#[derive(Debug, Clone)]
pub struct HttpServices {
    layers_endpoint: String,
    plot_endpoint: String,
}

impl HttpServices {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            layers_endpoint: config.layers_endpoint.clone(),
            plot_endpoint: config.plot_endpoint.clone(),
        }
    }
}

impl LayerService for HttpServices {
    async fn fetch_layers(&self, wms_url: &str) -> Result<LayerCatalog, FetchError> {
        log::info!("Requesting layers for {}", wms_url);

        let response = Request::get(&self.layers_endpoint)
            .query([("wms_url", wms_url)])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let body = read_body(response).await?;
        LayersResponse::from_json(&body)?.into_catalog()
    }
}

impl PlotService for HttpServices {
    async fn fetch_plot(&self, request: &PlotRequest) -> Result<String, FetchError> {
        log::info!(
            "Requesting time series of {} ({}) at drawn location",
            request.variable,
            request.dataset
        );

        let pairs = request.query_pairs();
        let response = Request::get(&self.plot_endpoint)
            .query(pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        read_body(response).await
    }
}

async fn read_body(response: Response) -> Result<String, FetchError> {
    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }
    response
        .text()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}
