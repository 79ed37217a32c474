use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };

use super::{ check_status, ChatClient, CompletionResponse, ProviderError };
use crate::llm::LlmConfig;

pub struct OpenAIChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    store: Option<bool>,
}

#[derive(Deserialize)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>
    ) -> Result<Self, ProviderError> {
        let chat_model = model.unwrap_or_else(|| "gpt-4o-mini".to_string());
        let api_url = base_url.unwrap_or_else(|| "https://api.openai.com".to_string());
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e|
                ProviderError::Config(format!("Invalid API key format: {}", e))
            )?
        );

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            model: chat_model,
            base_url: api_url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ProviderError> {
        if config.llm_type != crate::llm::LlmType::OpenAI {
            return Err(ProviderError::Config("Invalid config type for OpenAIChatClient".into()));
        }
        let api_key = config.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::Config("OpenAI API key is required".into()))?;

        Self::new(api_key, config.completion_model.clone(), config.base_url.clone())
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));

        let messages = vec![OpenAIMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];

        let req = OpenAIChatRequest {
            model: self.model.clone(),
            messages,
            temperature: 1.0,
            max_completion_tokens: Some(2048),
            store: Some(false),
        };

        debug!("OpenAI chat completion with model {}", self.model);
        let resp = check_status(self.http.post(&url).json(&req).send().await?).await?;
        let resp = resp
            .json::<OpenAIChatResponse>().await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let content = resp.choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No response from OpenAI API".into()))?
            .message.content;

        Ok(CompletionResponse { response: content })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
