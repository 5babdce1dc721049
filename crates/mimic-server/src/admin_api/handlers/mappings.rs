//! Mapping management handlers.

use crate::admin_api::types::{
    collect_body, error_response, json_response, ListMappingsResponse, ListMeta, MappingCreated,
    MappingSummary,
};
use crate::mapping::{MappingDefinition, MappingDocument, MappingSpec, MappingStore};
use crate::metrics::Metrics;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tracing::{info, warn};

/// POST /__admin/mappings/new - Register a mapping
pub async fn handle_add(
    req: Request<Incoming>,
    store: Arc<MappingStore>,
    metrics: Arc<Metrics>,
) -> Response<Full<Bytes>> {
    let body = match collect_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e),
    };

    let definition = match MappingDocument::parse(&body) {
        Ok(d) => d,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid mapping: {e}"))
        }
    };

    if let Some(shadowed) = shadowed_by(&store, &definition) {
        warn!(
            method = %definition.request.method(),
            url = definition.request.url(),
            shadowed_id = %shadowed.id(),
            "New mapping shadows an existing mapping with identical request criteria"
        );
    }

    let handle = store.insert(definition);
    metrics.record_registrations(1);
    info!(id = %handle.id, sequence = handle.sequence, "Mapping registered");

    json_response(
        StatusCode::CREATED,
        &MappingCreated {
            id: handle.id,
            sequence: handle.sequence,
        },
    )
}

/// The newest registered mapping with exactly the same request criteria, if any.
/// Insertion stays permissive; the new mapping simply wins from then on.
fn shadowed_by(
    store: &MappingStore,
    definition: &MappingDefinition,
) -> Option<Arc<MappingSpec>> {
    store
        .all_mappings()
        .iter_newest_first()
        .find(|m| m.request() == &definition.request)
        .cloned()
}

/// GET /__admin/mappings - List mappings in registration order
pub fn handle_list(store: Arc<MappingStore>) -> Response<Full<Bytes>> {
    let snapshot = store.all_mappings();
    let mappings: Vec<MappingSummary> = snapshot
        .iter()
        .map(|m| MappingSummary::from(m.as_ref()))
        .collect();

    json_response(
        StatusCode::OK,
        &ListMappingsResponse {
            meta: ListMeta {
                total: mappings.len(),
            },
            mappings,
        },
    )
}

/// POST /__admin/mappings/reset - Remove every mapping
pub fn handle_reset(store: Arc<MappingStore>) -> Response<Full<Bytes>> {
    let removed = store.reset();
    info!(removed = removed, "Mappings reset");

    json_response(StatusCode::OK, &serde_json::json!({ "removed": removed }))
}
