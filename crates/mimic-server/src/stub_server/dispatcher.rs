//! Request handling for stub traffic.
//!
//! The dispatcher is the seam between hyper and the mapping engine: it normalizes the
//! incoming request, matches it against the current store snapshot and renders the result.

use crate::mapping::{
    find_match, normalize_url, render, MappingStore, RequestDescriptor, ResponseDescriptor,
};
use crate::metrics::Metrics;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::debug;

/// Answers stub requests from a mapping store. Holds no per-request state.
#[derive(Clone)]
pub struct StubDispatcher {
    store: Arc<MappingStore>,
    metrics: Arc<Metrics>,
}

impl StubDispatcher {
    pub fn new(store: Arc<MappingStore>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    pub fn store(&self) -> &Arc<MappingStore> {
        &self.store
    }

    /// Match a normalized request and render the response.
    pub fn handle(&self, request: &RequestDescriptor) -> ResponseDescriptor {
        let snapshot = self.store.all_mappings();
        let matched = find_match(request, &snapshot);

        match &matched {
            Some(mapping) => debug!(
                method = request.method(),
                url = request.url(),
                sequence = mapping.sequence(),
                "Request matched mapping"
            ),
            None => debug!(
                method = request.method(),
                url = request.url(),
                mappings = snapshot.len(),
                "No mapping matched request"
            ),
        }
        self.metrics
            .record_request(request.method(), matched.is_some());

        render(matched.as_deref())
    }

    /// hyper service entry point.
    pub async fn handle_http(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let request = describe(&req);
        Ok(self.handle(&request).into_response())
    }
}

/// Build the request descriptor for a transport request.
///
/// The url is the percent-decoded path plus query string. Header names come lowercased from
/// hyper; values that are not valid UTF-8 are decoded lossily.
pub fn describe<B>(req: &Request<B>) -> RequestDescriptor {
    let raw_url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    req.headers().iter().fold(
        RequestDescriptor::new(req.method().as_str(), normalize_url(raw_url)),
        |descriptor, (name, value)| {
            descriptor.with_header(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        },
    )
}
