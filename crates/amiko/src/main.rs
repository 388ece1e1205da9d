// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Amiko - a chat backend for conversing with AI friend personas.
//!
//! This is the binary entry point for the Amiko server.

mod serve;

use clap::{Parser, Subcommand};

/// Amiko - a chat backend for conversing with AI friend personas.
#[derive(Parser, Debug)]
#[command(name = "amiko", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Amiko server.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match amiko_config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("amiko: configuration error: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            init_tracing(&config.agent.log_level);
            if let Err(e) = serve::run_serve(config).await {
                tracing::error!(error = %e, "server exited with error");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            // API key is omitted from the printout on purpose.
            println!("agent.name = {}", config.agent.name);
            println!("agent.log_level = {}", config.agent.log_level);
            println!("gemini.model = {}", config.gemini.model);
            println!("gemini.api_key set = {}", config.gemini.api_key.is_some());
            println!("reply.context_turns = {}", config.reply.context_turns);
            println!("reply.max_reply_chars = {}", config.reply.max_reply_chars);
            println!("storage.database_path = {}", config.storage.database_path);
            println!("gateway.enabled = {}", config.gateway.enabled);
            println!("gateway.host = {}", config.gateway.host);
            println!("gateway.port = {}", config.gateway.port);
        }
        None => {
            println!("amiko: use --help for available commands");
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("amiko={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
