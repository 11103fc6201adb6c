//! Request matching logic.
//!
//! # Responsibilities
//! - Match method (exact, case-sensitive)
//! - Match path (exact, no trailing-slash normalization)
//! - Match required query parameters (subset semantics)
//! - Match required headers (case-insensitive name, exact value)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Empty requirement list = always matches
//! - Parameters and headers not listed are ignored
//! - Pure functions of the request, no I/O or allocation on the hot path

use axum::http::HeaderName;

use crate::http::request::IncomingRequest;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &IncomingRequest) -> bool;
}

/// Matches the HTTP method.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    method: String,
}

impl MethodMatcher {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &IncomingRequest) -> bool {
        req.method == self.method
    }
}

/// Matches the request path exactly.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    path: String,
}

impl PathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Matcher for PathMatcher {
    fn matches(&self, req: &IncomingRequest) -> bool {
        req.path == self.path
    }
}

/// Requires every listed query parameter to be present with the listed value.
///
/// A key repeated in the request satisfies the requirement if any of its
/// occurrences carries the value.
#[derive(Debug, Clone, Default)]
pub struct QueryMatcher {
    required: Vec<(String, String)>,
}

impl QueryMatcher {
    pub fn new(required: Vec<(String, String)>) -> Self {
        Self { required }
    }

    pub fn required(&self) -> &[(String, String)] {
        &self.required
    }
}

impl Matcher for QueryMatcher {
    fn matches(&self, req: &IncomingRequest) -> bool {
        self.required
            .iter()
            .all(|(key, value)| req.query_values(key).any(|v| v == value))
    }
}

/// Requires every listed header to be present with exactly the listed value.
#[derive(Debug, Clone, Default)]
pub struct HeaderMatcher {
    // HeaderName is always lowercase, which gives case-insensitive lookup.
    required: Vec<(HeaderName, String)>,
}

impl HeaderMatcher {
    pub fn new(required: Vec<(HeaderName, String)>) -> Self {
        Self { required }
    }

    pub fn required(&self) -> &[(HeaderName, String)] {
        &self.required
    }
}

impl Matcher for HeaderMatcher {
    fn matches(&self, req: &IncomingRequest) -> bool {
        self.required.iter().all(|(name, value)| {
            req.headers
                .get_all(name)
                .iter()
                .any(|v| v.as_bytes() == value.as_bytes())
        })
    }
}

/// The full pattern a stub is registered with.
#[derive(Debug, Clone)]
pub struct RequestPattern {
    pub method: MethodMatcher,
    pub path: PathMatcher,
    pub query: QueryMatcher,
    pub headers: HeaderMatcher,
}

impl Matcher for RequestPattern {
    fn matches(&self, req: &IncomingRequest) -> bool {
        // Cheapest checks first
        self.method.matches(req)
            && self.path.matches(req)
            && self.query.matches(req)
            && self.headers.matches(req)
    }
}
