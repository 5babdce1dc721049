//! JSON registration documents.
//!
//! This is the wire format accepted by the admin API and by mapping files loaded at startup:
//!
//! ```json
//! {
//!   "request":  { "method": "GET", "url": "/header/dependent",
//!                 "headers": { "Accept": { "equalTo": "text/xml" } } },
//!   "response": { "status": 304, "headers": { "Content-Type": "text/plain" } }
//! }
//! ```
//!
//! Documents are parsed strictly and translated into a [`MappingDefinition`]; the matching
//! engine never sees JSON.

use super::types::{
    MappingDefinition, MappingError, MappingSpec, RequestMethod, RequestPattern, ResponseSpec,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete mapping document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingDocument {
    pub request: RequestDocument,
    pub response: ResponseDocument,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestDocument {
    /// Case-insensitive verb; GET when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, HeaderMatchDocument>,
}

/// Exact-match criterion for one request header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderMatchDocument {
    #[serde(rename = "equalTo")]
    pub equal_to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseDocument {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Kept in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty", with = "ordered_headers")]
    pub headers: Vec<(String, String)>,
}

impl MappingDocument {
    /// Parse and validate a JSON document.
    pub fn parse(json: &[u8]) -> Result<MappingDefinition, MappingError> {
        let document: MappingDocument = serde_json::from_slice(json)?;
        document.into_definition()
    }

    /// Validate this document and turn it into a mapping definition.
    pub fn into_definition(self) -> Result<MappingDefinition, MappingError> {
        let method = match self.request.method.as_deref() {
            Some(m) => m.parse::<RequestMethod>()?,
            None => RequestMethod::Get,
        };

        let url = normalize_url(&self.request.url);
        let mut request = RequestPattern::new(method, url)?;
        for (name, matcher) in self.request.headers {
            // Names are case-insensitive, so "Accept" and "accept" are the same criterion
            if request.headers().contains_key(&name.to_ascii_lowercase()) {
                return Err(MappingError::DuplicateHeader(name));
            }
            request = request.with_header(name, matcher.equal_to);
        }

        let mut response = ResponseSpec::new(self.response.status)?;
        for (name, value) in &self.response.headers {
            response = response.with_header(name, value)?;
        }
        if let Some(body) = self.response.body {
            response = response.with_body(body);
        }

        Ok(MappingDefinition::new(request, response))
    }
}

impl From<&MappingSpec> for MappingDocument {
    fn from(mapping: &MappingSpec) -> Self {
        let request = mapping.request();
        let response = mapping.response();
        MappingDocument {
            request: RequestDocument {
                method: Some(request.method().as_str().to_string()),
                url: request.url().to_string(),
                headers: request
                    .headers()
                    .iter()
                    .map(|(name, value)| {
                        (
                            name.clone(),
                            HeaderMatchDocument {
                                equal_to: value.clone(),
                            },
                        )
                    })
                    .collect(),
            },
            response: ResponseDocument {
                status: response.status().as_u16(),
                body: response.body().map(str::to_string),
                headers: response
                    .headers()
                    .iter()
                    .map(|(name, value)| {
                        (
                            name.as_str().to_string(),
                            String::from_utf8_lossy(value.as_bytes()).into_owned(),
                        )
                    })
                    .collect(),
            },
        }
    }
}

/// Percent-decode a url so registrations compare against the decoded form incoming
/// requests are normalized to.
pub fn normalize_url(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// (De)serialize a JSON object of string values as an ordered list of pairs.
mod ordered_headers {
    use serde::de::{Deserializer, MapAccess, Visitor};
    use serde::ser::{SerializeMap, Serializer};
    use std::fmt;

    pub fn serialize<S>(headers: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(headers.len()))?;
        for (name, value) in headers {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Vec<(String, String)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping header names to string values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut headers = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    headers.push((name, value));
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
