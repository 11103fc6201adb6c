//! Canned responses.

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use super::StubError;

/// The response a stub answers with. Validated when the stub is created so
/// writing it back can never fail.
#[derive(Debug, Clone)]
pub struct StubResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl StubResponse {
    /// A 200 response with no headers.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Build a response from raw parts, rejecting invalid status codes and headers.
    pub fn build<I, K, V>(status: u16, body: impl Into<Bytes>, headers: I) -> Result<Self, StubError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let status = StatusCode::from_u16(status).map_err(|_| StubError::InvalidStatus(status))?;

        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let (name, value) = (name.as_ref(), value.as_ref());
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| StubError::InvalidHeaderName(name.to_string()))?;
            let header_value = HeaderValue::from_str(value).map_err(|_| StubError::InvalidHeaderValue {
                name: name.to_string(),
                value: value.to_string(),
            })?;
            header_map.append(header_name, header_value);
        }

        Ok(Self {
            status,
            headers: header_map,
            body: body.into(),
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Render as a transport response. Bytes and HeaderMap clones are cheap.
    pub fn to_response(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        response.headers_mut().extend(self.headers.clone());
        response
    }
}

/// The fixed answer for requests no stub matched: 404, empty body, no headers.
pub fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}
