use log::warn;
use std::io::Write;

use super::{ ChatView, MessageKind };
use crate::models::compare::ComparisonEntry;

/// Line-oriented view that prints the conversation to any writer.
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render_message(&mut self, kind: MessageKind, text: &str) {
        let label = match kind {
            MessageKind::User => "You",
            MessageKind::Assistant => "Assistant",
            MessageKind::System => "System",
            MessageKind::Error => "Error",
        };
        self.line(&format!("{}: {}", label, text));
    }

    fn clear_messages(&mut self) {
        self.line("--- new conversation ---");
    }

    fn clear_input(&mut self) {}

    fn render_comparison(&mut self, entries: &[ComparisonEntry]) {
        self.line("--- comparison ---");
        for entry in entries {
            self.line(&format!("[{}]", entry.model));
            self.line(&entry.reply);
        }
        self.line("------------------");
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Model(String),
    ListModels,
    Theme(Option<String>),
    Upload(Vec<String>),
    Compare(String),
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str =
    "Commands: /model <name>, /models, /theme [text], /upload <path>..., /compare <message>, /quit";

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Send(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "model" if !arg.is_empty() => Command::Model(arg.to_string()),
        "models" => Command::ListModels,
        "theme" => Command::Theme(Some(arg.to_string()).filter(|t| !t.is_empty())),
        "upload" if !arg.is_empty() => {
            Command::Upload(arg.split_whitespace().map(str::to_string).collect())
        }
        "compare" => Command::Compare(arg.to_string()),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}
