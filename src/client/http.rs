use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{ Form, Part };
use reqwest::{ Client as HttpClient, Response };
use serde::de::DeserializeOwned;

use super::{ ChatBackend, ClientError };
use crate::models::api::{ ErrorResponse, ModelsResponse, UploadResponse };
use crate::models::chat::{ ChatRequest, ChatResponse };

/// Talks to the chat API over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    http: HttpClient,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return resp.json::<T>().await.map_err(ClientError::from);
    }

    let body = resp.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => err.detail,
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };
    Err(ClientError::Rejected { status: status.as_u16(), detail })
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn chat(&self, req: &ChatRequest) -> Result<String, ClientError> {
        debug!("POST /api/chat model={} history={}", req.model, req.conversation.len());
        let resp = self.http.post(self.url("/api/chat")).json(req).send().await?;
        let body: ChatResponse = read_json(resp).await?;
        Ok(body.reply)
    }

    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ClientError> {
        debug!("POST /api/upload {} ({} bytes)", filename, bytes.len());
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()));
        let resp = self.http.post(self.url("/api/upload")).multipart(form).send().await?;
        let body: UploadResponse = read_json(resp).await?;
        Ok(body.detail)
    }

    async fn models(&self) -> Result<Vec<String>, ClientError> {
        let resp = self.http.get(self.url("/api/models")).send().await?;
        let body: ModelsResponse = read_json(resp).await?;
        Ok(body.models)
    }
}
