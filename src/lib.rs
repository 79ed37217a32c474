pub mod agent;
pub mod cli;
pub mod client;
pub mod error;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;
pub mod store;

use agent::ChatAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Models: {}", args.models);
    info!("Compare Models: {}", args.compare_models);
    info!("Compare Prompt: {}", args.compare_prompt);
    info!("Upload Store: {}", args.upload_store);
    if args.upload_store.eq_ignore_ascii_case("disk") {
        info!("Upload Directory: {}", args.upload_dir);
    }
    info!("API Key Provided: {}", args.api_key().is_some());
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let agent = Arc::new(ChatAgent::from_args(&args)?);
    info!("Starting server on: {}", args.server_addr);
    let server = Server::new(agent, args);
    server.run().await?;

    Ok(())
}
