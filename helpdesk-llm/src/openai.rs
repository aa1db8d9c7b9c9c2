//! OpenAI-compatible `/chat/completions` client. Wire types stay private.

use anyhow::Context as _;
use helpdesk_utils::retry::Permanent;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::message::ChatMessage;

#[derive(Clone, Debug)]
pub(crate) struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub(crate) fn new(base_url: &str, model: String, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to build completion HTTP client")?;
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint,
            model,
            api_key,
        })
    }

    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    /// One round trip. Returns the first choice's content, possibly empty.
    pub(crate) async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> anyhow::Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(Permanent("OPENAI_API_KEY is not configured".to_owned()).into());
        };

        let payload = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };

        debug!(
            model = %self.model,
            turns = messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("completion request to {} failed", self.endpoint))?;

        let response = check_status(response).await?;

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .context("failed to parse completion response body")?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pass 2xx through. 429 and 5xx are transient; other statuses are permanent.
async fn check_status(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_owned());

    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => format!("HTTP {status}: {}", envelope.error.message),
        Err(_) => format!("HTTP {status}: {body}"),
    };

    error!(%status, %message, "completion request returned HTTP error");

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        anyhow::bail!(message);
    }
    Err(Permanent(message).into())
}
