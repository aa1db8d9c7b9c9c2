//! API error taxonomy and its JSON rendering: `{ "error": <message>, "code": <CODE> }`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use helpdesk_llm::GenerationFailed;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Shown for failures whose cause stays in the server log.
pub const GENERIC_FAILURE_MESSAGE: &str = "メッセージ送信に失敗しました";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Config(String),

    #[error("パスワードが正しくありません")]
    InvalidCredential,

    #[error("本日のリクエスト上限に達しました。明日再度お試しください。")]
    RateLimitExceeded,

    #[error("Productionモードは未実装です")]
    NotImplemented,

    #[error(transparent)]
    GenerationFailed(#[from] GenerationFailed),

    /// Detail is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredential => StatusCode::UNAUTHORIZED,
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Self::Config(_) | Self::GenerationFailed(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidCredential => "INVALID_PASSWORD",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::NotImplemented => "NOT_IMPLEMENTED",
            Self::GenerationFailed(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Internal(detail) => {
                error!(detail = %detail, "internal error");
                GENERIC_FAILURE_MESSAGE.to_owned()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.public_message(),
            "code": self.code(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_code_pairs() {
        let cases = [
            (ApiError::InvalidRequest("x".into()), 400, "INVALID_REQUEST"),
            (ApiError::Config("x".into()), 500, "CONFIG_ERROR"),
            (ApiError::InvalidCredential, 401, "INVALID_PASSWORD"),
            (ApiError::RateLimitExceeded, 429, "RATE_LIMIT_EXCEEDED"),
            (ApiError::NotImplemented, 501, "NOT_IMPLEMENTED"),
            (ApiError::GenerationFailed(GenerationFailed), 500, "INTERNAL_ERROR"),
            (ApiError::Internal("x".into()), 500, "INTERNAL_ERROR"),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status().as_u16(), status, "{err:?}");
            assert_eq!(err.code(), code, "{err:?}");
        }
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = ApiError::Internal("redis://secret-host refused".into());
        assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn generation_failure_uses_generic_text() {
        let err = ApiError::from(GenerationFailed);
        assert_eq!(err.public_message(), GenerationFailed.to_string());
    }
}
