use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };

use super::{ check_status, ChatClient, CompletionResponse, ProviderError };
use crate::llm::LlmConfig;

/// Plain prompt endpoint: `POST {"prompt": ...}` answered with `{"text": ...}`.
#[derive(Debug)]
pub struct EndpointClient {
    http: HttpClient,
    url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    text: String,
}

impl EndpointClient {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self {
            http: HttpClient::new(),
            url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ProviderError> {
        if config.llm_type != crate::llm::LlmType::Endpoint {
            return Err(ProviderError::Config("Invalid config type for EndpointClient".into()));
        }
        let url = config.base_url
            .clone()
            .ok_or_else(|| ProviderError::Config("endpoint models need a URL".into()))?;

        Ok(Self::new(url, config.api_key.clone()))
    }
}

#[async_trait]
impl ChatClient for EndpointClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, ProviderError> {
        debug!("POST {} ({} prompt bytes)", self.url, prompt.len());
        let mut req = self.http.post(&self.url).json(&GenerateRequest { prompt });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = check_status(req.send().await?).await?;
        let data = resp
            .json::<GenerateResponse>().await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(CompletionResponse { response: data.text })
    }

    fn get_model(&self) -> String {
        self.url.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.url.clone())
    }
}
