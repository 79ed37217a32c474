use serde::{ Deserialize, Serialize };

use crate::models::chat::{ ChatMessage, Role };

/// Ordered user/assistant turns, sent back with every chat request.
///
/// Serialized as a bare JSON array. There is no length cap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Records a completed exchange, user turn first.
    pub fn push_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(ChatMessage::user(user));
        self.messages.push(ChatMessage::assistant(assistant));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

impl From<Vec<ChatMessage>> for ConversationHistory {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

pub fn format_history_for_prompt(conversation: &ConversationHistory) -> String {
    if conversation.is_empty() {
        return String::new();
    }
    let mut result = String::from("Previous conversation:\n");
    for msg in conversation.messages() {
        result.push_str(&format!("{}: {}\n", msg.role, msg.content));
    }

    result
}

/// Builds the provider prompt: prior turns, then an optional `Theme:` line, then the new message.
///
/// A missing or blank theme leaves the `Theme:` line out entirely.
pub fn build_prompt(conversation: &ConversationHistory, theme: Option<&str>, message: &str) -> String {
    let mut prompt = format_history_for_prompt(conversation);
    if let Some(theme) = theme.map(str::trim).filter(|t| !t.is_empty()) {
        prompt.push_str(&format!("Theme: {}\n", theme));
    }
    prompt.push_str(&format!("{}: {}", Role::User, message));
    prompt
}
