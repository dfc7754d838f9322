//! Clients for the server endpoints the viewer consumes.
//!
//! Both services are async traits so the synchronizer can be driven by the
//! browser implementation in `http` or by scripted fakes in tests.
//!
//! Note: these carry no `Send` bounds since the viewer runs on the single
//! browser thread.

#[cfg(target_arch = "wasm32")]
mod http;

#[cfg(target_arch = "wasm32")]
pub use http::HttpServices;

use crate::wms::LayerCatalog;
use chrono::{DateTime, SecondsFormat, Utc};
use std::future::Future;

/// Errors that can occur while talking to the server.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed.
    #[error("Request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success HTTP status.
    #[error("Server returned HTTP {0}")]
    Status(u16),
    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),
    /// The server reported `success: false`.
    #[error("Server reported failure: {}", .0.as_deref().unwrap_or("no details"))]
    Reported(Option<String>),
    /// The server succeeded but listed no layers.
    #[error("No layers available")]
    EmptyCatalog,
}

/// Source of layer catalogs for WMS endpoints.
pub trait LayerService {
    /// Fetches the layers available at `wms_url`.
    fn fetch_layers(&self, wms_url: &str) -> impl Future<Output = Result<LayerCatalog, FetchError>>;
}

/// Renderer of time-series plots for a drawn location.
pub trait PlotService {
    /// Requests a plot and returns the markup to show in the plot modal.
    fn fetch_plot(&self, request: &PlotRequest) -> impl Future<Output = Result<String, FetchError>>;
}

/// Parameters of a time-series plot request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    /// Drawn location as a GeoJSON string
    pub geometry: String,
    pub variable: String,
    pub dataset: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub vertical_level: Option<String>,
}

impl PlotRequest {
    /// Query parameters, omitting absent optional fields.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("geometry", self.geometry.clone()),
            ("variable", self.variable.clone()),
            ("dataset", self.dataset.clone()),
        ];
        if let Some(start) = self.start_time {
            pairs.push(("start_time", format_time(&start)));
        }
        if let Some(end) = self.end_time {
            pairs.push(("end_time", format_time(&end)));
        }
        if let Some(level) = &self.vertical_level {
            pairs.push(("vertical_level", level.clone()));
        }
        pairs
    }
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request() -> PlotRequest {
        PlotRequest {
            geometry: "{}".to_string(),
            variable: "temp".to_string(),
            dataset: "GFS".to_string(),
            start_time: None,
            end_time: None,
            vertical_level: None,
        }
    }

    #[test]
    fn test_query_omits_absent_fields() {
        let pairs = request().query_pairs();
        let keys: Vec<_> = pairs.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["geometry", "variable", "dataset"]);
    }

    #[test]
    fn test_query_formats_times_as_rfc3339() {
        let request = PlotRequest {
            start_time: DateTime::from_timestamp(1_577_836_800, 0),
            end_time: DateTime::from_timestamp(1_577_923_200, 0),
            vertical_level: Some("850".to_string()),
            ..request()
        };

        let pairs = request.query_pairs();
        assert_eq!(pairs[3], ("start_time", "2020-01-01T00:00:00Z".to_string()));
        assert_eq!(pairs[4], ("end_time", "2020-01-02T00:00:00Z".to_string()));
        assert_eq!(pairs[5], ("vertical_level", "850".to_string()));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FetchError::Reported(None).to_string(),
            "Server reported failure: no details"
        );
        assert_eq!(FetchError::Status(502).to_string(), "Server returned HTTP 502");
    }
}
