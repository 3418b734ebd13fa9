// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `parley train`: add a query/response pair through a running service

use anyhow::Result;
use colored::Colorize;

use parley_core::domain::config::NetworkConfig;

use crate::server::ServerClient;

pub async fn run(
    query: String,
    response: String,
    source: Option<String>,
    network: &NetworkConfig,
) -> Result<()> {
    let client = ServerClient::new(&network.bind_address, network.port)?;
    let outcome = client
        .train(&query, &response, source.as_deref())
        .await?;

    println!("{}", format!("✓ {}", outcome.message).green());
    if !outcome.persisted {
        println!(
            "{}",
            "⚠ Entry is held in memory only; the knowledge file could not be written".yellow()
        );
    }

    Ok(())
}
