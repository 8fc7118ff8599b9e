pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;
pub mod youtube;

use agent::VideoAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or("adapter default"));
    info!("Transcript Languages: {}", args.transcript_languages);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("TLS Enabled: {}", args.enable_tls);
    if args.cors_allowed_origins.trim().is_empty() {
        info!("CORS Origins: any");
    } else {
        info!("CORS Origins: {}", args.cors_allowed_origins);
    }
    info!("-------------------------");

    let agent = Arc::new(VideoAgent::from_args(&args)?);
    info!("Starting server on: {}", args.server_addr);
    let server = Server::new(agent, args);
    server.run().await?;

    Ok(())
}
