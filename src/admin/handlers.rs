use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::cassette::StubDeclaration;
use crate::http::AppState;
use crate::stub::StubId;

#[derive(Serialize)]
pub struct ServerStatus {
    pub version: &'static str,
    pub stubs: usize,
    pub unmatched: usize,
}

#[derive(Serialize)]
pub struct StubSummary {
    pub id: StubId,
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub status: u16,
    pub hits: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<ServerStatus> {
    Json(ServerStatus {
        version: env!("CARGO_PKG_VERSION"),
        stubs: state.registry.len(),
        unmatched: state.hits.unmatched(),
    })
}

pub async fn list_stubs(State(state): State<AppState>) -> Json<Vec<StubSummary>> {
    let summaries = state
        .registry
        .snapshot()
        .iter()
        .map(|stub| StubSummary {
            id: stub.id(),
            method: stub.method().to_string(),
            path: stub.path().to_string(),
            query: stub.query_requirements().to_vec(),
            headers: stub
                .header_requirements()
                .iter()
                .map(|(name, value)| (name.as_str().to_string(), value.clone()))
                .collect(),
            status: stub.response().status().as_u16(),
            hits: state.hits.hits(stub.id()),
        })
        .collect();

    Json(summaries)
}

pub async fn create_stub(
    State(state): State<AppState>,
    Json(declaration): Json<StubDeclaration>,
) -> Response {
    match declaration.into_stub() {
        Ok(stub) => {
            let stub = state.registry.add(stub);
            (StatusCode::CREATED, Json(serde_json::json!({ "id": stub.id() }))).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected stub declaration");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

pub async fn reset_stubs(State(state): State<AppState>) -> StatusCode {
    state.reset();
    tracing::info!("Stubs reset via admin API");
    StatusCode::NO_CONTENT
}
