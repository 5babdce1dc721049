//! Response rendering.
//!
//! Turns the outcome of a match into a transport-neutral [`ResponseDescriptor`], and that
//! descriptor into a hyper response.

use super::types::MappingSpec;
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{Response, StatusCode};

/// What the transport should send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
    pub status: StatusCode,
    pub headers: Vec<(HeaderName, HeaderValue)>,
    /// `None` when the response has no entity; `Some("")` is an empty entity.
    pub body: Option<Bytes>,
}

impl ResponseDescriptor {
    /// The fixed response for requests no mapping answers.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            headers: Vec::new(),
            body: None,
        }
    }

    /// First value of a header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(k, _)| k.as_str().eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body.unwrap_or_default()));
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        for (name, value) in self.headers {
            headers.insert(name, value);
        }
        response
    }
}

/// Render the response for a match result.
pub fn render(matched: Option<&MappingSpec>) -> ResponseDescriptor {
    let Some(mapping) = matched else {
        return ResponseDescriptor::not_found();
    };
    let spec = mapping.response();

    // Configured order is kept; a repeated name takes the slot of its first occurrence
    // and the value of its last one.
    let mut headers: Vec<(HeaderName, HeaderValue)> = Vec::with_capacity(spec.headers().len());
    for (name, value) in spec.headers() {
        match headers.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => slot.1 = value.clone(),
            None => headers.push((name.clone(), value.clone())),
        }
    }

    ResponseDescriptor {
        status: spec.status(),
        headers,
        body: spec.body().map(|b| Bytes::copy_from_slice(b.as_bytes())),
    }
}
