use chat_assistant::cli::ClientArgs;
use chat_assistant::client::terminal::{ parse_command, Command, TerminalView, HELP };
use chat_assistant::client::{
    ChatBackend,
    ChatController,
    ChatView,
    HttpBackend,
    MessageKind,
    SelectedFile,
    UiEvent,
};
use chat_assistant::llm::parse_model_list;
use clap::Parser;
use dotenv::dotenv;
use log::info;
use std::error::Error;
use std::path::Path;
use tokio::io::{ AsyncBufReadExt, BufReader };

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = ClientArgs::parse();
    info!("Connecting to {} with model {}", args.server_url, args.model);

    let backend = HttpBackend::new(args.server_url.clone());
    let view = TerminalView::new(std::io::stdout());
    let mut controller = ChatController::new(backend, view, args.model.clone())
        .with_compare_models(parse_model_list(&args.compare_models));
    controller.set_theme(args.theme.clone());
    controller.view_mut().render_message(MessageKind::System, HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Send(text) => {
                let enter = UiEvent::KeyDown { key: "Enter".into(), shift: false };
                controller.handle(enter, &text).await;
            }
            Command::Model(model) => {
                controller.handle(UiEvent::ModelChanged(model.clone()), "").await;
                controller
                    .view_mut()
                    .render_message(MessageKind::System, &format!("Now chatting with {}", model));
            }
            Command::ListModels => {
                let text = match controller.backend().models().await {
                    Ok(models) => format!("Available models: {}", models.join(", ")),
                    Err(e) => format!("Could not list models: {}", e),
                };
                controller.view_mut().render_message(MessageKind::System, &text);
            }
            Command::Theme(theme) => {
                controller.set_theme(theme);
                let text = match controller.theme() {
                    Some(theme) => format!("Theme set to '{}'", theme),
                    None => "Theme cleared".to_string(),
                };
                controller.view_mut().render_message(MessageKind::System, &text);
            }
            Command::Upload(paths) => {
                let mut files = Vec::with_capacity(paths.len());
                for path in paths {
                    match tokio::fs::read(&path).await {
                        Ok(bytes) => {
                            let name = Path::new(&path)
                                .file_name()
                                .map(|n| n.to_string_lossy().into_owned())
                                .unwrap_or(path.clone());
                            files.push(SelectedFile { name, bytes });
                        }
                        Err(e) => {
                            controller
                                .view_mut()
                                .render_message(
                                    MessageKind::System,
                                    &format!("Failed to read {}: {}", path, e)
                                );
                        }
                    }
                }
                controller.handle(UiEvent::FilesSelected(files), "").await;
            }
            Command::Compare(text) => controller.handle(UiEvent::CompareClicked, &text).await,
            Command::Help => controller.view_mut().render_message(MessageKind::System, HELP),
            Command::Quit => break,
            Command::Unknown(cmd) => {
                controller
                    .view_mut()
                    .render_message(MessageKind::System, &format!("Unknown command {}. {}", cmd, HELP));
            }
        }
    }

    Ok(())
}
