use std::time::Duration;

use anyhow::Context as _;
use helpdesk_utils::retry::{RetryPolicy, with_retry};
use ollama_rs::{
    Ollama,
    generation::chat::{ChatMessage as OllamaMessage, request::ChatMessageRequest},
    models::ModelOptions,
};
use thiserror::Error;
use tracing::{debug, error};

use crate::message::{ChatMessage, Role};
use crate::openai::OpenAiClient;
use crate::prompt::system_prompt;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1";
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 500;

/// Substituted when the service answers with an empty completion.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "すみません、応答生成に失敗しました。";

/// The only error callers see; causes are logged, never returned.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("AI応答の生成に失敗しました。しばらく経ってから再度お試しください。")]
pub struct GenerationFailed;

/// Which completion service to call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendConfig {
    OpenAi {
        base_url: String,
        model: String,
        api_key: Option<String>,
    },
    Ollama {
        host: String,
        port: u16,
        model: String,
    },
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "openai",
            Self::Ollama { .. } => "ollama",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi { model, .. } | Self::Ollama { model, .. } => model,
        }
    }

    /// Whether a request could succeed without further configuration.
    pub fn has_credential(&self) -> bool {
        match self {
            Self::OpenAi { api_key, .. } => api_key.is_some(),
            Self::Ollama { .. } => true,
        }
    }
}

#[derive(Clone, Debug)]
enum CompletionBackend {
    OpenAi(OpenAiClient),
    Ollama { client: Ollama, model: String },
}

/// Fixed-prompt, fixed-sampling wrapper around the completion service.
#[derive(Clone, Debug)]
pub struct CompletionGateway {
    backend: CompletionBackend,
    retry: RetryPolicy,
}

impl CompletionGateway {
    pub fn new(config: &BackendConfig, timeout: Duration) -> anyhow::Result<Self> {
        let backend = match config {
            BackendConfig::OpenAi {
                base_url,
                model,
                api_key,
            } => CompletionBackend::OpenAi(
                OpenAiClient::new(base_url, model.clone(), api_key.clone())
                    .context("failed to initialize OpenAI-compatible backend")?,
            ),
            BackendConfig::Ollama { host, port, model } => CompletionBackend::Ollama {
                client: Ollama::new(host.clone(), *port),
                model: model.clone(),
            },
        };

        Ok(Self {
            backend,
            retry: RetryPolicy::single_retry(timeout),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            CompletionBackend::OpenAi(_) => "openai",
            CompletionBackend::Ollama { .. } => "ollama",
        }
    }

    pub fn model(&self) -> &str {
        match &self.backend {
            CompletionBackend::OpenAi(client) => client.model(),
            CompletionBackend::Ollama { model, .. } => model,
        }
    }

    /// Produce the assistant's next turn for `transcript`.
    pub async fn generate(&self, transcript: &[ChatMessage]) -> Result<String, GenerationFailed> {
        let messages = with_system_prompt(transcript);

        let result = with_retry("completion", self.retry, || self.complete_once(&messages)).await;

        match result {
            Ok(text) => {
                let reply = text.trim();
                if reply.is_empty() {
                    debug!(backend = self.backend_name(), "empty completion; using placeholder");
                    return Ok(EMPTY_REPLY_PLACEHOLDER.to_owned());
                }
                Ok(reply.to_owned())
            }
            Err(err) => {
                error!(
                    ?err,
                    backend = self.backend_name(),
                    model = self.model(),
                    "completion failed"
                );
                Err(GenerationFailed)
            }
        }
    }

    async fn complete_once(&self, messages: &[ChatMessage]) -> anyhow::Result<String> {
        match &self.backend {
            CompletionBackend::OpenAi(client) => {
                client
                    .complete(messages, TEMPERATURE, MAX_OUTPUT_TOKENS)
                    .await
            }
            CompletionBackend::Ollama { client, model } => {
                let mapped = messages
                    .iter()
                    .map(|message| match message.role {
                        Role::System => OllamaMessage::system(message.content.clone()),
                        Role::User => OllamaMessage::user(message.content.clone()),
                        Role::Assistant => OllamaMessage::assistant(message.content.clone()),
                    })
                    .collect();

                let request = ChatMessageRequest::new(model.clone(), mapped).options(
                    ModelOptions::default()
                        .temperature(TEMPERATURE)
                        .num_predict(MAX_OUTPUT_TOKENS as i32),
                );
                let response = client
                    .send_chat_messages(request)
                    .await
                    .context("failed to get ollama chat response")?;

                Ok(response.message.content)
            }
        }
    }
}

/// System prompt first, then the caller's user and assistant turns in order.
///
/// Caller-supplied system turns are dropped.
fn with_system_prompt(transcript: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(transcript.len() + 1);
    messages.push(ChatMessage::system(system_prompt()));
    messages.extend(
        transcript
            .iter()
            .filter(|message| message.role != Role::System)
            .cloned(),
    );
    messages
}
