//! Pluggable cassette decoders.
//!
//! The loader only needs "a list of declarations from this text"; the
//! concrete syntax is picked from the file extension.

use std::path::Path;

use thiserror::Error;

use crate::cassette::schema::{CassetteDocument, StubDeclaration};

/// A decoder's description of why a document was rejected.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DecodeError(String);

impl From<serde_yaml::Error> for DecodeError {
    fn from(e: serde_yaml::Error) -> Self {
        Self(e.to_string())
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}

impl From<toml::de::Error> for DecodeError {
    fn from(e: toml::de::Error) -> Self {
        Self(e.to_string())
    }
}

/// Turns the text of a cassette file into an ordered list of declarations.
pub trait CassetteDecoder: Send + Sync {
    fn decode(&self, source: &str) -> Result<Vec<StubDeclaration>, DecodeError>;
}

/// A cassette is either a bare list of declarations or an `interactions`
/// mapping. Each decoder peeks at the top-level shape first and then decodes
/// straight into that form, so errors name the offending field.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl CassetteDecoder for YamlDecoder {
    fn decode(&self, source: &str) -> Result<Vec<StubDeclaration>, DecodeError> {
        // An empty YAML file is a cassette with no interactions.
        if source.trim().is_empty() {
            return Ok(Vec::new());
        }
        let shape: serde_yaml::Value = serde_yaml::from_str(source)?;
        match shape {
            serde_yaml::Value::Null => Ok(Vec::new()),
            serde_yaml::Value::Sequence(_) => serde_yaml::from_str(source).map_err(DecodeError::from),
            _ => serde_yaml::from_str::<CassetteDocument>(source)
                .map(|document| document.interactions)
                .map_err(DecodeError::from),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl CassetteDecoder for JsonDecoder {
    fn decode(&self, source: &str) -> Result<Vec<StubDeclaration>, DecodeError> {
        let shape: serde_json::Value = serde_json::from_str(source)?;
        if shape.is_array() {
            serde_json::from_str(source).map_err(DecodeError::from)
        } else {
            serde_json::from_str::<CassetteDocument>(source)
                .map(|document| document.interactions)
                .map_err(DecodeError::from)
        }
    }
}

/// TOML has no top-level arrays, so documents use `[[interactions]]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlDecoder;

impl CassetteDecoder for TomlDecoder {
    fn decode(&self, source: &str) -> Result<Vec<StubDeclaration>, DecodeError> {
        toml::from_str::<CassetteDocument>(source)
            .map(|document| document.interactions)
            .map_err(DecodeError::from)
    }
}

/// Pick a decoder from the file extension (case-insensitive).
pub fn decoder_for(path: &Path) -> Option<&'static dyn CassetteDecoder> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let decoder: &'static dyn CassetteDecoder = match extension.as_str() {
        "yml" | "yaml" => &YamlDecoder,
        "json" => &JsonDecoder,
        "toml" => &TomlDecoder,
        _ => return None,
    };
    Some(decoder)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
- method: GET
  url: /hello
  response:
    status: 200
    body: OK, zoomer
    headers:
      X-Request-Id: fake-request-id
- method: POST
  url: /book
  response:
    status: 201
    body: Book created
"#;

    #[test]
    fn test_yaml_list() {
        let declarations = YamlDecoder.decode(YAML).unwrap();
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].url, "/hello");
        assert_eq!(declarations[0].response.headers["X-Request-Id"], "fake-request-id");
        assert_eq!(declarations[1].response.status, 201);
    }

    #[test]
    fn test_yaml_interactions() {
        let source = "interactions:\n  - method: GET\n    url: /a\n";
        let declarations = YamlDecoder.decode(source).unwrap();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].response.status, 200);
    }

    #[test]
    fn test_empty_yaml() {
        assert!(YamlDecoder.decode("\n").unwrap().is_empty());
    }

    #[test]
    fn test_toml_interactions() {
        let source = r#"
[[interactions]]
method = "GET"
url = "/hello"

[interactions.response]
status = 202
body = "accepted"
"#;
        let declarations = TomlDecoder.decode(source).unwrap();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].response.status, 202);
    }

    #[test]
    fn test_json_rejects_garbage() {
        assert!(JsonDecoder.decode("{not json").is_err());
        assert!(YamlDecoder.decode("- method: GET\n  nothing: here\n").is_err());
    }

    #[test]
    fn test_errors_name_the_missing_field() {
        let err = YamlDecoder.decode("- method: GET\n  response:\n    status: 200\n").unwrap_err();
        assert!(err.to_string().contains("missing field `url`"), "{}", err);

        let err = YamlDecoder
            .decode("interactions:\n  - url: /a\n")
            .unwrap_err();
        assert!(err.to_string().contains("missing field `method`"), "{}", err);

        let err = JsonDecoder.decode(r#"[{"method": "GET"}]"#).unwrap_err();
        assert!(err.to_string().contains("missing field `url`"), "{}", err);

        let err = JsonDecoder.decode(r#"{"stubs": []}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `interactions`"), "{}", err);

        let err = TomlDecoder
            .decode("[[interactions]]\nmethod = \"GET\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("missing field `url`"), "{}", err);

        let err = YamlDecoder.decode("- method: GET\n  url: [1, 2]\n").unwrap_err();
        assert!(!err.to_string().contains("did not match any variant"), "{}", err);
    }

    #[test]
    fn test_json_interactions() {
        let declarations = JsonDecoder
            .decode(r#"{"interactions": [{"method": "GET", "url": "/a"}]}"#)
            .unwrap();
        assert_eq!(declarations.len(), 1);
    }

    #[test]
    fn test_decoder_for_extension() {
        assert!(decoder_for(Path::new("a/b.yml")).is_some());
        assert!(decoder_for(Path::new("a/b.YAML")).is_some());
        assert!(decoder_for(Path::new("b.json")).is_some());
        assert!(decoder_for(Path::new("b.toml")).is_some());
        assert!(decoder_for(Path::new("README.md")).is_none());
        assert!(decoder_for(Path::new("noext")).is_none());
    }
}
