// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use parley_core::domain::config::{ParleyConfigManifest, ProviderConfig};

const MINIMAL_TEMPLATE: &str = include_str!("../../templates/config-minimal.yaml");
const FULL_TEMPLATE: &str = include_str!("../../templates/config-with-examples.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path
        #[arg(short, long, default_value = "./parley-config.yaml")]
        output: PathBuf,

        /// Include every section with comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(&output, examples).await,
    }
}

fn describe_key(provider: &ProviderConfig) -> String {
    match (&provider.api_key, provider.resolve_api_key()) {
        (None, _) => "(none)".to_string(),
        (Some(raw), Some(_)) if raw.starts_with("env:") => format!("{} (set)", raw),
        (Some(raw), None) if raw.starts_with("env:") => format!("{} (not set)", raw),
        (Some(_), _) => "(literal)".to_string(),
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = ParleyConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  --config flag: {}", path.display()),
            None => println!("  --config flag: {}", "(not set)".dimmed()),
        }
        for (i, path) in ParleyConfigManifest::discovery_paths().iter().enumerate() {
            let marker = if path.exists() { "✓".green() } else { "·".dimmed() };
            println!("  {}. {} {}", i + 1, marker, path.display());
        }
        println!();
    }

    let spec = &config.spec;
    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Node:".bold());
    println!("  Name: {}", config.metadata.name);
    println!();

    println!("{}", "Engine:".bold());
    println!("  Knowledge file: {}", spec.knowledge.path.display());
    println!("  Cache TTL: {}s", spec.cache.ttl_seconds);
    println!("  Fetch timeout: {}s", spec.fetch.timeout_seconds);
    println!("  Listen timeout: {}s", spec.listen.timeout_seconds);
    println!("  Matcher min score: {}", spec.matcher.min_score);
    println!();

    println!("{}", "Providers:".bold());
    for (name, provider) in [
        ("weather", &spec.providers.weather),
        ("news", &spec.providers.news),
        ("wikipedia", &spec.providers.wikipedia),
    ] {
        println!("  {}", name.bold());
        println!("    Endpoint: {}", provider.endpoint);
        println!("    API key: {}", describe_key(provider));
    }
    println!();

    println!("{}", "Service:".bold());
    println!(
        "  Listen: {}:{}",
        spec.network.bind_address, spec.network.port
    );
    if spec.network.cors_origins.is_empty() {
        println!("  CORS: {}", "disabled".dimmed());
    } else {
        println!("  CORS origins: {}", spec.network.cors_origins.join(", "));
    }
    println!(
        "  Logging: {} ({})",
        spec.observability.logging.level, spec.observability.logging.format
    );
    if spec.observability.metrics.enabled {
        println!("  Metrics: enabled on port {}", spec.observability.metrics.port);
    } else {
        println!("  Metrics: {}", "disabled".dimmed());
    }

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = ParleyConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: &Path, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        FULL_TEMPLATE
    } else {
        MINIMAL_TEMPLATE
    };

    std::fs::write(output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
