use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use helpdesk_core::{AppState, Mode, faq};
use helpdesk_llm::ChatMessage;
use helpdesk_llm::message::last_user_content;
use helpdesk_utils::parse::identity_from_forwarded;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::RouteMeta;
use crate::error::ApiError;

pub const META: RouteMeta = RouteMeta {
    method: "POST",
    path: "/chat",
    desc: "Answer the latest turn of a support conversation.",
};

const MESSAGES_REQUIRED: &str = "メッセージが必要です";
const FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub mode: Mode,
    pub remaining_requests: Option<u64>,
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(%rejection, "rejected chat body");
        ApiError::InvalidRequest(MESSAGES_REQUIRED.to_owned())
    })?;
    let messages = request
        .messages
        .ok_or_else(|| ApiError::InvalidRequest(MESSAGES_REQUIRED.to_owned()))?;

    let response = match state.mode() {
        Mode::Mock => mock_reply(&messages),
        Mode::Demo => demo_reply(&state, &headers, &messages).await?,
        Mode::Production => return Err(ApiError::NotImplemented),
    };

    Ok(Json(response))
}

fn mock_reply(messages: &[ChatMessage]) -> ChatResponse {
    ChatResponse {
        reply: faq::respond(last_user_content(messages)).to_owned(),
        mode: Mode::Mock,
        remaining_requests: None,
    }
}

async fn demo_reply(
    state: &AppState,
    headers: &HeaderMap,
    messages: &[ChatMessage],
) -> Result<ChatResponse, ApiError> {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok());
    let identity = identity_from_forwarded(forwarded);

    if !state.limiter.admit(&identity).await {
        info!(%identity, limit = state.limiter.daily_limit(), "daily quota exceeded");
        return Err(ApiError::RateLimitExceeded);
    }

    let reply = state.gateway.generate(messages).await?;
    let remaining = state.limiter.remaining(&identity).await;

    Ok(ChatResponse {
        reply,
        mode: Mode::Demo,
        remaining_requests: Some(remaining),
    })
}
