pub mod client;
pub mod message;
mod openai;
pub mod prompt;

pub use client::{BackendConfig, CompletionGateway, GenerationFailed};
pub use message::{ChatMessage, Role};
