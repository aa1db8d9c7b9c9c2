use axum::Json;
use axum::extract::State;
use helpdesk_core::{AppState, Mode};
use serde::Serialize;

use crate::RouteMeta;

pub const META: RouteMeta = RouteMeta {
    method: "GET",
    path: "/health",
    desc: "Liveness probe reporting the active mode.",
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mode: Mode,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        mode: state.mode(),
    })
}
