//! Route dispatch logic for the Admin API.

use crate::admin_api::handlers::{mappings, system};
use crate::admin_api::types::not_found;
use crate::mapping::MappingStore;
use crate::metrics::Metrics;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response};
use std::sync::Arc;
use tracing::debug;

const ADMIN_PREFIX: &str = "/__admin";

/// Parsed admin route
#[derive(Debug, PartialEq, Eq)]
enum AdminRoute {
    /// /__admin/mappings
    Mappings,
    /// /__admin/mappings/new
    NewMapping,
    /// /__admin/mappings/reset
    ResetMappings,
    /// /__admin/health
    Health,
    /// /__admin/metrics
    Metrics,
}

impl AdminRoute {
    /// Parse route from a request path
    fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix(ADMIN_PREFIX)?;
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["mappings"] => Some(AdminRoute::Mappings),
            ["mappings", "new"] => Some(AdminRoute::NewMapping),
            ["mappings", "reset"] => Some(AdminRoute::ResetMappings),
            ["health"] => Some(AdminRoute::Health),
            ["metrics"] => Some(AdminRoute::Metrics),
            _ => None,
        }
    }
}

/// Main request router
pub async fn route_request(
    req: Request<Incoming>,
    store: Arc<MappingStore>,
    metrics: Arc<Metrics>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    debug!("Admin API: {} {}", method, path);

    let response = match (method, AdminRoute::parse(&path)) {
        (Method::POST, Some(AdminRoute::NewMapping)) => mappings::handle_add(req, store, metrics).await,
        (Method::GET, Some(AdminRoute::Mappings)) => mappings::handle_list(store),
        (Method::POST, Some(AdminRoute::ResetMappings)) => mappings::handle_reset(store),
        (Method::GET, Some(AdminRoute::Health)) => system::handle_health(),
        (Method::GET, Some(AdminRoute::Metrics)) => system::handle_metrics(&store, &metrics),
        _ => not_found(),
    };
    Ok(response)
}
