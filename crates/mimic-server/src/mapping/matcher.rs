//! Request matching logic.
//!
//! Mappings are scanned newest first and the first satisfied pattern wins, so a later
//! registration overrides an earlier one with overlapping criteria. Matching never changes
//! the store; the same request can be matched any number of times.

use super::store::MappingSnapshot;
use super::types::{MappingSpec, RequestPattern};
use std::sync::Arc;

/// Normalized view of an incoming request.
///
/// `url` is the decoded path plus query string. Header names are lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: String,
    url: String,
    headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Add a request header. Repeated names are kept as separate entries.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .push((name.as_ref().to_ascii_lowercase(), value.into()));
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// All values carried for `name` (already lowercased).
    fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl RequestPattern {
    /// Check whether `request` satisfies this pattern.
    pub fn matches(&self, request: &RequestDescriptor) -> bool {
        if !self.method().accepts(request.method()) {
            return false;
        }

        if self.url() != request.url() {
            return false;
        }

        // All required headers must be present with an exact value; extras are ignored
        self.headers().iter().all(|(name, expected)| {
            request
                .header_values(name)
                .any(|actual| actual == expected.as_str())
        })
    }
}

/// Select the mapping that answers `request`, if any.
pub fn find_match(
    request: &RequestDescriptor,
    mappings: &MappingSnapshot,
) -> Option<Arc<MappingSpec>> {
    mappings
        .iter_newest_first()
        .find(|mapping| mapping.request().matches(request))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::store::MappingStore;
    use crate::mapping::types::{MappingDefinition, RequestMethod, ResponseSpec};

    fn register(store: &MappingStore, pattern: RequestPattern, status: u16) {
        store.insert(MappingDefinition::new(
            pattern,
            ResponseSpec::new(status).unwrap(),
        ));
    }

    fn pattern(method: RequestMethod, url: &str) -> RequestPattern {
        RequestPattern::new(method, url).unwrap()
    }

    fn matched_status(store: &MappingStore, request: &RequestDescriptor) -> Option<u16> {
        find_match(request, &store.all_mappings()).map(|m| m.response().status().as_u16())
    }

    #[test]
    fn test_exact_method_and_url() {
        let store = MappingStore::new();
        register(&store, pattern(RequestMethod::Get, "/a/registered/resource"), 401);

        assert_eq!(
            matched_status(&store, &RequestDescriptor::new("GET", "/a/registered/resource")),
            Some(401)
        );
        assert_eq!(
            matched_status(&store, &RequestDescriptor::new("POST", "/a/registered/resource")),
            None
        );
        assert_eq!(
            matched_status(&store, &RequestDescriptor::new("GET", "/a/registered/resource/")),
            None
        );
    }

    #[test]
    fn test_method_is_case_sensitive() {
        let store = MappingStore::new();
        register(&store, pattern(RequestMethod::Get, "/case"), 200);

        let lowercase = RequestDescriptor::new("get", "/case");
        assert_eq!(lowercase.method(), "get");
        assert_eq!(matched_status(&store, &lowercase), None);
        assert_eq!(
            matched_status(&store, &RequestDescriptor::new("GET", "/case")),
            Some(200)
        );
    }

    #[test]
    fn test_url_includes_query_string() {
        let store = MappingStore::new();
        register(&store, pattern(RequestMethod::Get, "/search?q=rust"), 200);

        assert_eq!(
            matched_status(&store, &RequestDescriptor::new("GET", "/search?q=rust")),
            Some(200)
        );
        assert_eq!(
            matched_status(&store, &RequestDescriptor::new("GET", "/search")),
            None
        );
        assert_eq!(
            matched_status(&store, &RequestDescriptor::new("GET", "/search?q=Rust")),
            None
        );
    }

    #[test]
    fn test_any_method() {
        let store = MappingStore::new();
        register(&store, pattern(RequestMethod::Any, "/anything"), 200);

        for method in ["GET", "PUT", "POST", "DELETE", "HEAD", "OPTIONS", "PATCH"] {
            assert_eq!(
                matched_status(&store, &RequestDescriptor::new(method, "/anything")),
                Some(200),
                "method {method}"
            );
        }
    }

    #[test]
    fn test_header_names_case_insensitive_values_exact() {
        let store = MappingStore::new();
        register(
            &store,
            pattern(RequestMethod::Get, "/header/dependent")
                .with_header("Accept", "text/xml")
                .with_header("If-None-Match", "abcd1234"),
            304,
        );

        let request = RequestDescriptor::new("GET", "/header/dependent")
            .with_header("ACCEPT", "text/xml")
            .with_header("if-none-match", "abcd1234")
            .with_header("X-Extra", "ignored");
        assert_eq!(matched_status(&store, &request), Some(304));

        let wrong_case_value = RequestDescriptor::new("GET", "/header/dependent")
            .with_header("Accept", "TEXT/XML")
            .with_header("If-None-Match", "abcd1234");
        assert_eq!(matched_status(&store, &wrong_case_value), None);

        let missing = RequestDescriptor::new("GET", "/header/dependent")
            .with_header("Accept", "text/xml");
        assert_eq!(matched_status(&store, &missing), None);
    }

    #[test]
    fn test_repeated_header_any_value_matches() {
        let store = MappingStore::new();
        register(
            &store,
            pattern(RequestMethod::Get, "/multi").with_header("X-Tag", "b"),
            200,
        );

        let request = RequestDescriptor::new("GET", "/multi")
            .with_header("X-Tag", "a")
            .with_header("X-Tag", "b");
        assert_eq!(matched_status(&store, &request), Some(200));
    }

    #[test]
    fn test_most_recent_registration_wins() {
        let store = MappingStore::new();
        register(&store, pattern(RequestMethod::Get, "/overlap"), 200);
        register(
            &store,
            pattern(RequestMethod::Get, "/overlap").with_header("Accept", "text/xml"),
            406,
        );

        // Satisfies both: the later one answers
        let both = RequestDescriptor::new("GET", "/overlap").with_header("Accept", "text/xml");
        assert_eq!(matched_status(&store, &both), Some(406));

        // Only satisfies the first
        let plain = RequestDescriptor::new("GET", "/overlap");
        assert_eq!(matched_status(&store, &plain), Some(200));

        // A newer unconstrained mapping now shadows the header-specific one
        register(&store, pattern(RequestMethod::Get, "/overlap"), 202);
        assert_eq!(matched_status(&store, &both), Some(202));
    }

    #[test]
    fn test_matching_does_not_consume_mapping() {
        let store = MappingStore::new();
        register(&store, pattern(RequestMethod::Get, "/resource/100"), 200);
        let request = RequestDescriptor::new("GET", "/resource/100");

        for _ in 0..5 {
            assert_eq!(matched_status(&store, &request), Some(200));
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_no_mappings_is_no_match() {
        let store = MappingStore::new();
        assert!(find_match(
            &RequestDescriptor::new("GET", "/non-existent/resource"),
            &store.all_mappings()
        )
        .is_none());
    }
}
