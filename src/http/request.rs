//! Inbound request normalization.
//!
//! # Responsibilities
//! - Reduce a transport request to the fields stubs match on
//! - Split the query string into decoded key/value pairs
//!
//! # Design Decisions
//! - The request body is never read; stubs do not match on it
//! - Repeated query keys are kept in arrival order

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};

/// The parts of an inbound request that stub matching looks at.
#[derive(Debug, Clone, Default)]
pub struct IncomingRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl IncomingRequest {
    /// Create a request with no query parameters and no headers.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Build from the pieces of an HTTP request as received by the listener.
    pub fn from_parts(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            method: method.as_str().to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(parse_query).unwrap_or_default(),
            headers: headers.clone(),
        }
    }

    /// Replace the query parameters with those parsed from a raw query string.
    pub fn with_query(mut self, raw: &str) -> Self {
        self.query = parse_query(raw);
        self
    }

    /// Append a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// All values carried by the query parameter `key`.
    pub fn query_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Decode an `application/x-www-form-urlencoded` query string.
pub fn parse_query(raw: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect()
}
