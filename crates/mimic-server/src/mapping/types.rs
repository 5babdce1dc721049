//! Type definitions for stored mappings.
//!
//! A mapping pairs a [`RequestPattern`] with a [`ResponseSpec`]. Values are validated when
//! they are constructed, so everything that reaches the store is well formed.

use chrono::{DateTime, Utc};
use hyper::header::{HeaderName, HeaderValue};
use hyper::StatusCode;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Request side
// ============================================================================

/// HTTP methods a mapping can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestMethod {
    #[default]
    Get,
    Put,
    Post,
    Delete,
    Head,
    Options,
    /// Matches every request method
    Any,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Put => "PUT",
            RequestMethod::Post => "POST",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Head => "HEAD",
            RequestMethod::Options => "OPTIONS",
            RequestMethod::Any => "ANY",
        }
    }

    /// Check a request method (as sent on the wire) against this pattern method.
    /// Methods are case-sensitive.
    pub fn accepts(&self, method: &str) -> bool {
        match self {
            RequestMethod::Any => true,
            other => other.as_str() == method,
        }
    }

    /// The concrete method a wire method names, if it is one of the supported verbs.
    pub fn from_wire(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(RequestMethod::Get),
            "PUT" => Some(RequestMethod::Put),
            "POST" => Some(RequestMethod::Post),
            "DELETE" => Some(RequestMethod::Delete),
            "HEAD" => Some(RequestMethod::Head),
            "OPTIONS" => Some(RequestMethod::Options),
            _ => None,
        }
    }
}

impl FromStr for RequestMethod {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(RequestMethod::Get),
            "PUT" => Ok(RequestMethod::Put),
            "POST" => Ok(RequestMethod::Post),
            "DELETE" => Ok(RequestMethod::Delete),
            "HEAD" => Ok(RequestMethod::Head),
            "OPTIONS" => Ok(RequestMethod::Options),
            "ANY" => Ok(RequestMethod::Any),
            _ => Err(MappingError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matching criteria for an incoming request.
///
/// Header names are stored lowercased, which makes name comparison case-insensitive and
/// gives two patterns with the same criteria structural equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPattern {
    method: RequestMethod,
    url: String,
    headers: BTreeMap<String, String>,
}

impl RequestPattern {
    /// Create a pattern for `method` and an exact `url` (path plus optional query).
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Result<Self, MappingError> {
        let url = url.into();
        if url.is_empty() {
            return Err(MappingError::EmptyUrl);
        }
        Ok(Self {
            method,
            url,
            headers: BTreeMap::new(),
        })
    }

    /// Require a header with exactly `value` to be present on matching requests.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Required headers, keyed by lowercased name.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

// ============================================================================
// Response side
// ============================================================================

/// The canned response emitted when a mapping matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSpec {
    status: StatusCode,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Option<String>,
}

impl ResponseSpec {
    /// Create a response with the given status and no headers or body.
    ///
    /// Only final statuses (200-599) are accepted; HTTP/1 cannot send a 1xx as the response.
    pub fn new(status: u16) -> Result<Self, MappingError> {
        if !(200..=599).contains(&status) {
            return Err(MappingError::InvalidStatus(status));
        }
        let status = StatusCode::from_u16(status).map_err(|_| MappingError::InvalidStatus(status))?;
        Ok(Self {
            status,
            headers: Vec::new(),
            body: None,
        })
    }

    /// Append a response header. Order is kept as configured.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, MappingError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| MappingError::InvalidHeaderName(name.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            MappingError::InvalidHeaderValue {
                name: name.to_string(),
            }
        })?;
        self.headers.push((header_name, header_value));
        Ok(self)
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    /// `None` means the response carries no entity at all.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

// ============================================================================
// Mappings
// ============================================================================

/// A validated mapping that has not been registered yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDefinition {
    pub request: RequestPattern,
    pub response: ResponseSpec,
}

impl MappingDefinition {
    pub fn new(request: RequestPattern, response: ResponseSpec) -> Self {
        Self { request, response }
    }
}

/// A registered mapping. Never mutated after insertion.
#[derive(Debug, Clone)]
pub struct MappingSpec {
    id: Uuid,
    sequence: u64,
    registered_at: DateTime<Utc>,
    request: RequestPattern,
    response: ResponseSpec,
}

impl MappingSpec {
    pub(crate) fn register(definition: MappingDefinition, sequence: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            registered_at: Utc::now(),
            request: definition.request,
            response: definition.response,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Registration order; later registrations have larger numbers.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn request(&self) -> &RequestPattern {
        &self.request
    }

    pub fn response(&self) -> &ResponseSpec {
        &self.response
    }

    pub fn handle(&self) -> RegistrationHandle {
        RegistrationHandle {
            id: self.id,
            sequence: self.sequence,
        }
    }
}

/// Returned by the store when a mapping is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationHandle {
    pub id: Uuid,
    pub sequence: u64,
}

// ============================================================================
// Errors
// ============================================================================

/// Reasons a mapping document is rejected before it reaches the store.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Invalid mapping JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Request url must not be empty")]
    EmptyUrl,
    #[error("Unsupported request method: {0}")]
    UnsupportedMethod(String),
    #[error("Invalid status code: {0}")]
    InvalidStatus(u16),
    #[error("Header {0} is specified more than once")]
    DuplicateHeader(String),
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),
    #[error("Invalid value for header {name}")]
    InvalidHeaderValue { name: String },
}
