//! Stubs: a request pattern paired with a canned response.
//!
//! # Data Flow
//! ```text
//! stub(method, url, body, options)      cassette declaration
//!     → split url into path + query requirements
//!     → parse header requirements (options.rs)
//!     → build response (response.rs)
//!     → Stub (immutable, shared via Arc)
//!
//! At request time:
//!     IncomingRequest → matcher.rs (method, path, query, headers) → bool
//! ```
//!
//! # Design Decisions
//! - All validation happens at construction; a built Stub always renders
//! - Stubs are never mutated; replacing one means registering another
//! - Query requirements come from the query string of the registered url

pub mod matcher;
pub mod options;
pub mod response;

use std::fmt;

use axum::http::{HeaderName, Method};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::http::request::{parse_query, IncomingRequest};
use self::matcher::{HeaderMatcher, Matcher, MethodMatcher, PathMatcher, QueryMatcher, RequestPattern};

pub use self::options::{with_headers, with_response, StubOptions};
pub use self::response::StubResponse;

/// Errors raised while building a stub. Reported at registration, never at request time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StubError {
    #[error("stub method must not be empty")]
    EmptyMethod,

    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    #[error("stub path must not be empty")]
    EmptyPath,

    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("malformed header spec {0:?}, expected `Name: value`")]
    MalformedHeaderSpec(String),

    #[error("invalid header name: {0:?}")]
    InvalidHeaderName(String),

    #[error("invalid value {value:?} for header {name}")]
    InvalidHeaderValue { name: String, value: String },

    #[error("invalid status code: {0}")]
    InvalidStatus(u16),
}

/// Identifier handed out for every registered stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StubId(Uuid);

impl StubId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StubId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A matchable request pattern and the response returned when it matches.
#[derive(Debug, Clone)]
pub struct Stub {
    id: StubId,
    pattern: RequestPattern,
    response: StubResponse,
}

impl Stub {
    /// Build a stub the way `MockServer::stub_with` does: `body` is the response
    /// body unless `options` carries a response override.
    pub fn new(
        method: &str,
        url: &str,
        body: impl Into<String>,
        options: &StubOptions,
    ) -> Result<Self, StubError> {
        let header_requirements = options.header_requirements()?;
        let response = match options.response_override() {
            Some(o) => StubResponse::build(
                o.status,
                o.body.clone(),
                o.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            )?,
            None => StubResponse::ok(body.into()),
        };
        Self::from_parts(method, url, &header_requirements, response)
    }

    /// Build a stub from already separated parts.
    pub fn from_parts(
        method: &str,
        url: &str,
        header_requirements: &[(String, String)],
        response: StubResponse,
    ) -> Result<Self, StubError> {
        if method.is_empty() {
            return Err(StubError::EmptyMethod);
        }
        // Matching is case-sensitive, so a lowercase method could never match.
        if method.bytes().any(|b| b.is_ascii_lowercase()) {
            return Err(StubError::InvalidMethod(method.to_string()));
        }
        Method::from_bytes(method.as_bytes())
            .map_err(|_| StubError::InvalidMethod(method.to_string()))?;

        let (path, query) = split_url(url)?;

        let headers = header_requirements
            .iter()
            .map(|(name, value)| {
                HeaderName::from_bytes(name.as_bytes())
                    .map(|name| (name, value.clone()))
                    .map_err(|_| StubError::InvalidHeaderName(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: StubId::new(),
            pattern: RequestPattern {
                method: MethodMatcher::new(method),
                path: PathMatcher::new(path),
                query: QueryMatcher::new(query),
                headers: HeaderMatcher::new(headers),
            },
            response,
        })
    }

    pub fn id(&self) -> StubId {
        self.id
    }

    pub fn method(&self) -> &str {
        self.pattern.method.method()
    }

    pub fn path(&self) -> &str {
        self.pattern.path.path()
    }

    pub fn query_requirements(&self) -> &[(String, String)] {
        self.pattern.query.required()
    }

    pub fn header_requirements(&self) -> &[(HeaderName, String)] {
        self.pattern.headers.required()
    }

    pub fn response(&self) -> &StubResponse {
        &self.response
    }

    /// Whether every condition of this stub holds for `req`.
    pub fn matches(&self, req: &IncomingRequest) -> bool {
        self.pattern.matches(req)
    }
}

/// Split a registered url into its path and decoded query requirements.
///
/// Relative urls are resolved against a dummy origin so the path gets the same
/// percent-encoding and dot-segment handling as absolute ones (`http://host/path?q=1`),
/// and as the path the server sees on the wire.
pub fn split_url(url: &str) -> Result<(String, Vec<(String, String)>), StubError> {
    let invalid = |e: url::ParseError| StubError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    };

    let parsed = if url.contains("://") {
        url::Url::parse(url).map_err(invalid)?
    } else {
        let path = url.split(|c| c == '?' || c == '#').next().unwrap_or("");
        if path.is_empty() {
            return Err(StubError::EmptyPath);
        }
        // `//host/x` would be taken as scheme-relative.
        if path.starts_with("//") {
            return Err(StubError::InvalidUrl {
                url: url.to_string(),
                reason: "path must not start with `//`".to_string(),
            });
        }
        url::Url::parse("http://localhost/")
            .and_then(|base| base.join(url))
            .map_err(invalid)?
    };

    let query = parsed.query().map(parse_query).unwrap_or_default();
    Ok((parsed.path().to_string(), query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_split_relative_url() {
        let (path, query) = split_url("/get?foo=bar&a=b").unwrap();
        assert_eq!(path, "/get");
        assert_eq!(
            query,
            vec![("foo".to_string(), "bar".to_string()), ("a".to_string(), "b".to_string())]
        );

        let (path, query) = split_url("/plain").unwrap();
        assert_eq!(path, "/plain");
        assert!(query.is_empty());
    }

    #[test]
    fn test_split_absolute_url() {
        let (path, query) = split_url("http://example.com/maintenance?foo=bar").unwrap();
        assert_eq!(path, "/maintenance");
        assert_eq!(query, vec![("foo".to_string(), "bar".to_string())]);
    }

    #[test]
    fn test_relative_and_absolute_urls_normalize_alike() {
        let (relative, _) = split_url("/hello world").unwrap();
        let (absolute, _) = split_url("http://example.com/hello world").unwrap();
        assert_eq!(relative, "/hello%20world");
        assert_eq!(relative, absolute);

        let (relative, _) = split_url("/a/../b").unwrap();
        let (absolute, _) = split_url("http://example.com/a/../b").unwrap();
        assert_eq!(relative, "/b");
        assert_eq!(relative, absolute);

        let (path, query) = split_url("/frag?x=1#section").unwrap();
        assert_eq!(path, "/frag");
        assert_eq!(query, vec![("x".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_encoded_path_matches_wire_form() {
        let stub = Stub::new("GET", "/hello world", "ok", &StubOptions::default()).unwrap();
        assert!(stub.matches(&IncomingRequest::new("GET", "/hello%20world")));
    }

    #[test]
    fn test_split_rejects_empty_path() {
        assert_eq!(split_url(""), Err(StubError::EmptyPath));
        assert_eq!(split_url("?a=b"), Err(StubError::EmptyPath));
    }

    #[test]
    fn test_new_defaults_to_ok() {
        let stub = Stub::new("GET", "/abc", "ok", &StubOptions::default()).unwrap();
        assert_eq!(stub.method(), "GET");
        assert_eq!(stub.path(), "/abc");
        assert_eq!(stub.response().status(), StatusCode::OK);
        assert_eq!(stub.response().body().as_ref(), b"ok");
        assert!(stub.response().headers().is_empty());
    }

    #[test]
    fn test_new_with_query_in_url() {
        let stub = Stub::new("GET", "/get?foo=bar&a=b", "ok", &StubOptions::default()).unwrap();

        assert!(stub.matches(&IncomingRequest::new("GET", "/get").with_query("foo=bar&a=b")));
        assert!(!stub.matches(&IncomingRequest::new("GET", "/get").with_query("foo=bar")));
        assert!(stub.matches(&IncomingRequest::new("GET", "/get").with_query("a=b&foo=bar&extra=1")));
    }

    #[test]
    fn test_response_override_replaces_body() {
        let options = with_response(401, "No permissions", [("Access-Control-Allow-Origin", "*")]);
        let stub = Stub::new("GET", "/get", "", &options).unwrap();

        assert_eq!(stub.response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(stub.response().body().as_ref(), b"No permissions");
        assert_eq!(stub.response().headers()["access-control-allow-origin"], "*");
    }

    #[test]
    fn test_configuration_errors() {
        let none = StubOptions::default();
        assert_eq!(Stub::new("", "/abc", "", &none).unwrap_err(), StubError::EmptyMethod);
        assert_eq!(Stub::new("GET", "", "", &none).unwrap_err(), StubError::EmptyPath);
        assert!(matches!(
            Stub::new("GE T", "/abc", "", &none).unwrap_err(),
            StubError::InvalidMethod(_)
        ));
        assert_eq!(
            Stub::new("get", "/abc", "", &none).unwrap_err(),
            StubError::InvalidMethod("get".to_string())
        );
        assert!(matches!(
            Stub::new("Post", "/abc", "", &none).unwrap_err(),
            StubError::InvalidMethod(_)
        ));
        assert!(matches!(
            Stub::new("GET", "//host/abc", "", &none).unwrap_err(),
            StubError::InvalidUrl { .. }
        ));
        assert!(matches!(
            Stub::new("GET", "/abc", "", &with_headers("no colon")).unwrap_err(),
            StubError::MalformedHeaderSpec(_)
        ));
        assert!(matches!(
            Stub::new("GET", "/abc", "", &with_headers("bad name: x")).unwrap_err(),
            StubError::InvalidHeaderName(_)
        ));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Stub::new("GET", "/abc", "ok", &StubOptions::default()).unwrap();
        let b = Stub::new("GET", "/abc", "ok", &StubOptions::default()).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
