//! Optional stub configuration.
//!
//! Options are a plain record built by chaining setters:
//!
//! ```
//! use webmock::stub::options::{with_headers, StubOptions};
//!
//! let options = with_headers("Accept-Encoding: gzip,deflate")
//!     .with_response(401, "No permissions", [("Access-Control-Allow-Origin", "*")]);
//! assert_eq!(options.header_specs().len(), 1);
//! assert!(StubOptions::default().response_override().is_none());
//! ```

use super::StubError;

/// Replacement for the default `200` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOverride {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

/// Extra requirements and overrides applied when a stub is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StubOptions {
    header_specs: Vec<String>,
    response: Option<ResponseOverride>,
}

impl StubOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require request headers, given as `Name: value` lines.
    ///
    /// Parsed at registration, so a malformed spec fails the registration call.
    pub fn with_headers(mut self, spec: impl Into<String>) -> Self {
        self.header_specs.push(spec.into());
        self
    }

    /// Answer with this status, body and headers instead of `200` and the positional body.
    pub fn with_response<I, K, V>(mut self, status: u16, body: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.response = Some(ResponseOverride {
            status,
            body: body.into(),
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        });
        self
    }

    pub fn header_specs(&self) -> &[String] {
        &self.header_specs
    }

    pub fn response_override(&self) -> Option<&ResponseOverride> {
        self.response.as_ref()
    }

    /// All header requirements across every spec, in declaration order.
    pub fn header_requirements(&self) -> Result<Vec<(String, String)>, StubError> {
        let mut requirements = Vec::new();
        for spec in &self.header_specs {
            requirements.extend(parse_header_spec(spec)?);
        }
        Ok(requirements)
    }
}

/// Shorthand for `StubOptions::new().with_headers(spec)`.
pub fn with_headers(spec: impl Into<String>) -> StubOptions {
    StubOptions::new().with_headers(spec)
}

/// Shorthand for `StubOptions::new().with_response(status, body, headers)`.
pub fn with_response<I, K, V>(status: u16, body: impl Into<String>, headers: I) -> StubOptions
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    StubOptions::new().with_response(status, body, headers)
}

/// Parse `Name: value` lines. The value is everything after the first colon,
/// trimmed, so `Accept-Encoding: gzip,deflate` is a single requirement.
pub fn parse_header_spec(spec: &str) -> Result<Vec<(String, String)>, StubError> {
    spec.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| StubError::MalformedHeaderSpec(line.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(StubError::MalformedHeaderSpec(line.to_string()));
            }
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}
