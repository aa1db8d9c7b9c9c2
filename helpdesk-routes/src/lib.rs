pub mod auth;
pub mod chat;
pub mod error;
pub mod faq;
pub mod health;

use axum::Router;
use axum::routing::{get, post};
use helpdesk_core::AppState;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

pub struct RouteMeta {
    pub method: &'static str,
    pub path: &'static str,
    pub desc: &'static str,
}

pub const ROUTES: &[RouteMeta] = &[
    chat::META,
    auth::LOGIN_META,
    auth::STATUS_META,
    faq::META,
    health::META,
];

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(chat::META.path, post(chat::chat))
        .route(auth::PATH, get(auth::status).post(auth::login))
        .route(faq::META.path, get(faq::faq))
        .route(health::META.path, get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
