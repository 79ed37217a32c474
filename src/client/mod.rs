pub mod http;
pub mod terminal;

use async_trait::async_trait;
use futures::future::join_all;
use log::{ debug, warn };
use thiserror::Error;

use crate::history::ConversationHistory;
use crate::models::chat::{ ChatMessage, ChatRequest };
use crate::models::compare::ComparisonEntry;

pub use http::HttpBackend;

pub const APOLOGY: &str = "Sorry, something went wrong. Please try again.";
pub const DEFAULT_COMPARE_MODELS: [&str; 2] = ["model_a", "model_b"];

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status.
    #[error("{detail}")]
    Rejected {
        status: u16,
        detail: String,
    },

    /// The backend could not be reached or answered with something unreadable.
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, req: &ChatRequest) -> Result<String, ClientError>;
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ClientError>;
    async fn models(&self) -> Result<Vec<String>, ClientError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Assistant,
    System,
    Error,
}

/// Render surface the controller draws on.
pub trait ChatView {
    fn render_message(&mut self, kind: MessageKind, text: &str);
    fn clear_messages(&mut self);
    fn clear_input(&mut self);
    fn render_comparison(&mut self, entries: &[ComparisonEntry]);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    SendClicked,
    KeyDown {
        key: String,
        shift: bool,
    },
    ModelChanged(String),
    FilesSelected(Vec<SelectedFile>),
    CompareClicked,
}

/// Owns the conversation for one client session and turns UI events into backend calls.
pub struct ChatController<B, V> {
    backend: B,
    view: V,
    history: ConversationHistory,
    current_model: String,
    theme: Option<String>,
    compare_models: Vec<String>,
}

impl<B: ChatBackend, V: ChatView> ChatController<B, V> {
    pub fn new(backend: B, view: V, model: impl Into<String>) -> Self {
        Self {
            backend,
            view,
            history: ConversationHistory::new(),
            current_model: model.into(),
            theme: None,
            compare_models: DEFAULT_COMPARE_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn with_compare_models(mut self, models: Vec<String>) -> Self {
        self.compare_models = models;
        self
    }

    pub fn set_theme(&mut self, theme: Option<String>) {
        self.theme = theme.filter(|t| !t.trim().is_empty());
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn current_model(&self) -> &str {
        &self.current_model
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Dispatches one UI event. `input` is the current content of the message box.
    pub async fn handle(&mut self, event: UiEvent, input: &str) {
        match event {
            UiEvent::SendClicked => self.send(input).await,
            UiEvent::KeyDown { key, shift } => {
                if key == "Enter" && !shift {
                    self.send(input).await;
                }
            }
            UiEvent::ModelChanged(model) => self.select_model(model),
            UiEvent::FilesSelected(files) => self.upload(files).await,
            UiEvent::CompareClicked => self.compare(input).await,
        }
    }

    /// Switching models starts a fresh conversation.
    pub fn select_model(&mut self, model: impl Into<String>) {
        self.current_model = model.into();
        self.history.clear();
        self.view.clear_messages();
        debug!("Switched to model '{}'", self.current_model);
    }

    pub async fn send(&mut self, input: &str) {
        let message = input.trim();
        if message.is_empty() {
            return;
        }

        self.view.render_message(MessageKind::User, message);
        self.view.clear_input();

        let req = ChatRequest {
            message: message.to_string(),
            model: self.current_model.clone(),
            conversation: self.history.clone(),
            theme: self.theme.clone(),
        };
        match self.backend.chat(&req).await {
            Ok(reply) => {
                self.view.render_message(MessageKind::Assistant, &reply);
                self.history.push_turn(req.message, reply);
            }
            Err(ClientError::Rejected { status, detail }) => {
                warn!("Chat request rejected with {}: {}", status, detail);
                self.view.render_message(MessageKind::Error, &format!("Error: {}", detail));
            }
            Err(ClientError::Transport(cause)) => {
                warn!("Chat request failed: {}", cause);
                self.view.render_message(MessageKind::Error, APOLOGY);
            }
        }
    }

    /// Uploads one file at a time, in selection order.
    pub async fn upload(&mut self, files: Vec<SelectedFile>) {
        for file in files {
            match self.backend.upload(&file.name, file.bytes).await {
                Ok(detail) => {
                    self.view.render_message(MessageKind::System, &detail);
                    let note = format!("Uploaded file: {}", file.name);
                    self.view.render_message(MessageKind::User, &note);
                    self.history.push(ChatMessage::user(note));
                }
                Err(e) => {
                    warn!("Upload of '{}' failed: {}", file.name, e);
                    self.view.render_message(
                        MessageKind::System,
                        &format!("Failed to upload {}: {}", file.name, e)
                    );
                }
            }
        }
    }

    /// Asks every comparison model at once; the panel follows `compare_models` order.
    pub async fn compare(&mut self, input: &str) {
        let message = input.trim();
        if message.is_empty() {
            return;
        }

        let backend = &self.backend;
        let history = &self.history;
        let theme = &self.theme;
        let calls = self.compare_models.iter().map(|model| {
            let req = ChatRequest {
                message: message.to_string(),
                model: model.clone(),
                conversation: history.clone(),
                theme: theme.clone(),
            };
            async move {
                let reply = match backend.chat(&req).await {
                    Ok(reply) => reply,
                    Err(e) => format!("Error: {}", e),
                };
                ComparisonEntry { model: req.model, reply }
            }
        });
        let entries = join_all(calls).await;

        self.view.render_comparison(&entries);
    }
}
