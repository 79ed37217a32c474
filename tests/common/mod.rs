#![allow(dead_code)]

use async_trait::async_trait;
use chat_assistant::agent::ChatAgent;
use chat_assistant::client::{ ChatBackend, ChatView, ClientError, MessageKind };
use chat_assistant::llm::chat::{ ChatClient, CompletionResponse, ProviderError };
use chat_assistant::llm::gateway::ModelGateway;
use chat_assistant::models::chat::ChatRequest;
use chat_assistant::models::compare::ComparisonEntry;
use chat_assistant::store::{ FileStore, MemoryFileStore };
use std::collections::HashMap;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ Arc, Mutex };
use std::time::Duration;

/// Provider stand-in that records prompts and answers from a script.
pub struct StubClient {
    reply: Result<String, String>,
    delay: Duration,
    prompts: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(cause: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(cause.to_string()),
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(reply: &str, delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            delay: Duration::from_millis(delay_ms),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatClient for StubClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        tokio::time::sleep(self.delay).await;
        match &self.reply {
            Ok(text) => Ok(CompletionResponse { response: text.clone() }),
            Err(cause) => Err(ProviderError::InvalidResponse(cause.clone())),
        }
    }

    fn get_model(&self) -> String {
        "stub".to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

pub struct Fixture {
    pub agent: Arc<ChatAgent>,
    pub model_a: Arc<StubClient>,
    pub model_b: Arc<StubClient>,
    pub store: Arc<MemoryFileStore>,
}

/// Agent with `model_a`/`model_b` registered and compared, backed by a memory store.
pub fn fixture(model_a: Arc<StubClient>, model_b: Arc<StubClient>) -> Fixture {
    let gateway = ModelGateway::with_clients(vec![
        ("model_a".to_string(), model_a.clone() as Arc<dyn ChatClient>),
        ("model_b".to_string(), model_b.clone() as Arc<dyn ChatClient>),
    ]);
    let store = Arc::new(MemoryFileStore::new());
    let agent = ChatAgent::new(
        Arc::new(gateway),
        store.clone() as Arc<dyn FileStore>,
        vec!["model_a".to_string(), "model_b".to_string()],
        "Say hello".to_string()
    );
    Fixture { agent: Arc::new(agent), model_a, model_b, store }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    Message(MessageKind, String),
    ClearedMessages,
    ClearedInput,
    Comparison(Vec<(String, String)>),
}

#[derive(Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn messages(&self) -> Vec<(MessageKind, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Message(kind, text) => Some((*kind, text.clone())),
                _ => None,
            })
            .collect()
    }
}

impl ChatView for RecordingView {
    fn render_message(&mut self, kind: MessageKind, text: &str) {
        self.events.push(ViewEvent::Message(kind, text.to_string()));
    }

    fn clear_messages(&mut self) {
        self.events.push(ViewEvent::ClearedMessages);
    }

    fn clear_input(&mut self) {
        self.events.push(ViewEvent::ClearedInput);
    }

    fn render_comparison(&mut self, entries: &[ComparisonEntry]) {
        self.events.push(
            ViewEvent::Comparison(
                entries
                    .iter()
                    .map(|e| (e.model.clone(), e.reply.clone()))
                    .collect()
            )
        );
    }
}

#[derive(Clone, Debug)]
pub enum Scripted {
    Reply(String),
    Reject(u16, String),
    Unreachable,
}

/// Backend stand-in keyed by model (chat) or filename (upload).
#[derive(Default)]
pub struct ScriptedBackend {
    pub chat_script: HashMap<String, (Scripted, u64)>,
    pub upload_script: HashMap<String, Scripted>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    pub uploads: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedBackend {
    pub fn on_chat(mut self, model: &str, outcome: Scripted, delay_ms: u64) -> Self {
        self.chat_script.insert(model.to_string(), (outcome, delay_ms));
        self
    }

    pub fn on_upload(mut self, filename: &str, outcome: Scripted) -> Self {
        self.upload_script.insert(filename.to_string(), outcome);
        self
    }

    pub fn chat_count(&self) -> usize {
        self.chat_requests.lock().unwrap().len()
    }

    fn resolve(outcome: &Scripted) -> Result<String, ClientError> {
        match outcome {
            Scripted::Reply(text) => Ok(text.clone()),
            Scripted::Reject(status, detail) =>
                Err(ClientError::Rejected { status: *status, detail: detail.clone() }),
            Scripted::Unreachable => Err(ClientError::Transport("connection refused".into())),
        }
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn chat(&self, req: &ChatRequest) -> Result<String, ClientError> {
        self.chat_requests.lock().unwrap().push(req.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (outcome, delay) = self.chat_script
            .get(&req.model)
            .cloned()
            .unwrap_or((Scripted::Reject(400, format!("Model '{}' not supported.", req.model)), 0));
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Self::resolve(&outcome)
    }

    async fn upload(&self, filename: &str, _bytes: Vec<u8>) -> Result<String, ClientError> {
        self.uploads.lock().unwrap().push(filename.to_string());
        let outcome = self.upload_script
            .get(filename)
            .cloned()
            .unwrap_or(Scripted::Reply(format!("{} uploaded", filename)));
        Self::resolve(&outcome)
    }

    async fn models(&self) -> Result<Vec<String>, ClientError> {
        let mut models: Vec<String> = self.chat_script.keys().cloned().collect();
        models.sort();
        Ok(models)
    }
}

pub const BOUNDARY: &str = "X-CHAT-ASSISTANT-BOUNDARY";

pub fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field,
            filename
        ).as_bytes()
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}
