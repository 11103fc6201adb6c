//! Cassette document schema.
//!
//! All types derive Serde traits so any self-describing format can carry them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::stub::{Stub, StubError, StubResponse};

/// Mapping form of a cassette file: an `interactions` list. A bare top-level
/// list of declarations is accepted too; decoders pick the form from the
/// shape of the document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CassetteDocument {
    pub interactions: Vec<StubDeclaration>,
}

/// One request/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StubDeclaration {
    /// HTTP method to match, e.g. `GET`.
    pub method: String,

    /// Path with optional query string, or an absolute url.
    pub url: String,

    /// Request headers that must be present with exactly these values.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Response to serve.
    #[serde(default)]
    pub response: ResponseDeclaration,
}

/// Response part of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResponseDeclaration {
    /// Status code (default: 200).
    #[serde(default = "default_status")]
    pub status: u16,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_status() -> u16 {
    200
}

impl Default for ResponseDeclaration {
    fn default() -> Self {
        Self {
            status: default_status(),
            body: String::new(),
            headers: BTreeMap::new(),
        }
    }
}

impl StubDeclaration {
    /// Validate and turn into a registrable stub.
    pub fn into_stub(self) -> Result<Stub, StubError> {
        let response = StubResponse::build(
            self.response.status,
            self.response.body,
            self.response.headers.iter(),
        )?;
        let header_requirements: Vec<(String, String)> = self.headers.into_iter().collect();
        Stub::from_parts(&self.method, &self.url, &header_requirements, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_response_defaults() {
        let declaration: StubDeclaration =
            serde_json::from_str(r#"{"method": "GET", "url": "/hello"}"#).unwrap();
        assert_eq!(declaration.response.status, 200);
        assert!(declaration.response.body.is_empty());
        assert!(declaration.headers.is_empty());
    }

    #[test]
    fn test_interactions_document() {
        let document: CassetteDocument = serde_json::from_str(
            r#"{"interactions": [{"method": "GET", "url": "/a"}, {"method": "POST", "url": "/b"}]}"#,
        )
        .unwrap();
        assert_eq!(document.interactions.len(), 2);
        assert_eq!(document.interactions[1].method, "POST");
    }

    #[test]
    fn test_into_stub() {
        let declaration = StubDeclaration {
            method: "GET".into(),
            url: "/maintenance?foo=bar".into(),
            headers: BTreeMap::from([("Accept".to_string(), "text/plain".to_string())]),
            response: ResponseDeclaration {
                status: 503,
                body: "Service Unavailable".into(),
                headers: BTreeMap::from([("Retry-After".to_string(), "120".to_string())]),
            },
        };

        let stub = declaration.into_stub().unwrap();
        assert_eq!(stub.path(), "/maintenance");
        assert_eq!(stub.query_requirements(), &[("foo".to_string(), "bar".to_string())]);
        assert_eq!(stub.header_requirements().len(), 1);
        assert_eq!(stub.response().status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(stub.response().headers()["retry-after"], "120");
    }

    #[test]
    fn test_into_stub_rejects_bad_status() {
        let declaration = StubDeclaration {
            method: "GET".into(),
            url: "/x".into(),
            headers: BTreeMap::new(),
            response: ResponseDeclaration {
                status: 42,
                ..Default::default()
            },
        };
        assert_eq!(declaration.into_stub().unwrap_err(), StubError::InvalidStatus(42));
    }
}
