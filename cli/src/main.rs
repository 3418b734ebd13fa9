// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Parley CLI
//!
//! The `parley` binary drives the conversational engine.
//!
//! ## Commands
//!
//! - `parley chat` - Interactive console session that learns from the user
//! - `parley serve` - HTTP service (`/chat`, `/train`, `/health`)
//! - `parley ask|train|status` - Talk to a running service
//! - `parley config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use parley_cli::commands::{self, ConfigCommand};
use parley_cli::server;
use parley_core::domain::config::ParleyConfigManifest;

/// Parley - conversational assistant with intent routing and learning
#[derive(Parser)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "PARLEY_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// HTTP API port (default: from config, 5000)
    #[arg(long, global = true, env = "PARLEY_PORT")]
    port: Option<u16>,

    /// HTTP API host (default: from config, 127.0.0.1)
    #[arg(long, global = true, env = "PARLEY_HOST")]
    host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PARLEY_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive console conversation
    #[command(name = "chat")]
    Chat,

    /// Run the HTTP service
    #[command(name = "serve")]
    Serve,

    /// Send one query to a running service
    #[command(name = "ask")]
    Ask {
        /// Query text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Add a training record through a running service
    #[command(name = "train")]
    Train {
        #[arg(long)]
        query: String,

        #[arg(long)]
        response: String,

        /// Origin of the record; weather, news and wikipedia are rejected
        #[arg(long)]
        source: Option<String>,
    },

    /// Check a running service
    #[command(name = "status")]
    Status,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is normal
    let _ = dotenvy::dotenv();

    let Cli {
        config: config_path,
        port,
        host,
        log_level,
        command,
    } = Cli::parse();

    let manifest = ParleyConfigManifest::load_or_default(config_path.clone());
    let (level, format) = match &manifest {
        Ok(m) => (
            log_level.unwrap_or_else(|| m.spec.observability.logging.level.clone()),
            m.spec.observability.logging.format.clone(),
        ),
        Err(_) => (
            log_level.unwrap_or_else(|| "info".to_string()),
            "text".to_string(),
        ),
    };
    init_logging(&level, &format)?;

    let Some(command) = command else {
        eprintln!("{}", "No command specified. Use --help for usage.".yellow());
        std::process::exit(1);
    };

    // Flags win over the config file
    let settings = manifest
        .context("Failed to load configuration")
        .map(|mut config| {
            if let Some(host) = host {
                config.spec.network.bind_address = host;
            }
            if let Some(port) = port {
                config.spec.network.port = port;
            }
            config
        });

    match command {
        Commands::Config { command } => {
            commands::config::handle_command(command, config_path).await
        }
        Commands::Chat => commands::chat::run(settings?).await,
        Commands::Serve => server::start_server(settings?).await,
        Commands::Ask { text } => {
            let config = settings?;
            commands::ask::run(&text.join(" "), &config.spec.network).await
        }
        Commands::Train {
            query,
            response,
            source,
        } => {
            let config = settings?;
            commands::train::run(query, response, source, &config.spec.network).await
        }
        Commands::Status => {
            let config = settings?;
            commands::status::run(&config.spec.network).await
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    if format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        // Console replies own stdout
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .init();
    }

    Ok(())
}
