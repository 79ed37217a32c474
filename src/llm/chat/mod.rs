pub mod endpoint;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use super::{ LlmConfig, LlmType };
use self::endpoint::EndpointClient;
use self::ollama::OllamaClient;
use self::openai::OpenAIChatClient;

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Error communicating with model API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API returned status {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },

    #[error("Error generating response: {0}")]
    InvalidResponse(String),

    #[error("Invalid provider configuration: {0}")]
    Config(String),
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, ProviderError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, ProviderError> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Endpoint => {
            let specific_client = EndpointClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::Ollama => {
            let specific_client = OllamaClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::OpenAI => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}

/// Turns a non-2xx provider reply into `ProviderError::Status`, keeping the body for the caller.
pub(crate) async fn check_status(
    resp: reqwest::Response
) -> Result<reqwest::Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ProviderError::Status { status: status.as_u16(), body })
}
