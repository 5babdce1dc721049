//! System handlers: health, metrics.

use crate::admin_api::types::*;
use crate::mapping::MappingStore;
use crate::metrics::Metrics;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// GET /__admin/health - Health check
pub fn handle_health() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &serde_json::json!({"status": "ok"}))
}

/// GET /__admin/metrics - Prometheus metrics
pub fn handle_metrics(store: &MappingStore, metrics: &Metrics) -> Response<Full<Bytes>> {
    build_response_with_headers(
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4")],
        metrics.collect(store.len()),
    )
}
