use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use helpdesk_core::{AppState, Mode};
use helpdesk_utils::time::SECONDS_PER_DAY;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::RouteMeta;
use crate::error::ApiError;

pub const PATH: &str = "/auth";

pub const LOGIN_META: RouteMeta = RouteMeta {
    method: "POST",
    path: PATH,
    desc: "Check the demo password and issue a 24h session cookie.",
};

pub const STATUS_META: RouteMeta = RouteMeta {
    method: "GET",
    path: PATH,
    desc: "Report whether the caller is authenticated in the active mode.",
};

pub const COOKIE_NAME: &str = "demo_auth";
const COOKIE_VALUE: &str = "authenticated";
const PASSWORD_REQUIRED: &str = "パスワードが必要です";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub mode: Mode,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub authenticated: bool,
    pub mode: Mode,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(%rejection, "rejected auth body");
        ApiError::InvalidRequest(PASSWORD_REQUIRED.to_owned())
    })?;
    let password = request
        .password
        .filter(|password| !password.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest(PASSWORD_REQUIRED.to_owned()))?;

    match state.mode() {
        Mode::Mock => Ok(Json(LoginResponse {
            success: true,
            mode: Mode::Mock,
            message: "Mockモードでは認証は不要です",
        })
        .into_response()),
        Mode::Demo => {
            let expected = state.config.demo_password.as_deref().ok_or_else(|| {
                ApiError::Config("DEMO_PASSWORDが設定されていません".to_owned())
            })?;

            if !constant_time_eq(password.as_bytes(), expected.as_bytes()) {
                warn!("demo login rejected");
                return Err(ApiError::InvalidCredential);
            }

            info!("demo login accepted");
            let cookie = session_cookie(state.config.secure_cookies);
            Ok((
                [(header::SET_COOKIE, cookie)],
                Json(LoginResponse {
                    success: true,
                    mode: Mode::Demo,
                    message: "認証に成功しました",
                }),
            )
                .into_response())
        }
        Mode::Production => Err(ApiError::NotImplemented),
    }
}

pub async fn status(State(state): State<AppState>, headers: HeaderMap) -> Json<StatusResponse> {
    let mode = state.mode();
    let authenticated = match mode {
        Mode::Mock => true,
        Mode::Demo => has_session_cookie(&headers),
        Mode::Production => false,
    };

    Json(StatusResponse {
        authenticated,
        mode,
    })
}

fn session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{COOKIE_NAME}={COOKIE_VALUE}; HttpOnly; SameSite=Lax; Path=/; Max-Age={SECONDS_PER_DAY}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn has_session_cookie(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == COOKIE_NAME && value == COOKIE_VALUE)
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter()
        .zip(right)
        .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
