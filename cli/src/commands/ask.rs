// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `parley ask`: one-shot query against a running service

use anyhow::{Context, Result};
use colored::Colorize;

use parley_core::domain::config::NetworkConfig;

use crate::server::ServerClient;

pub async fn run(query: &str, network: &NetworkConfig) -> Result<()> {
    let client = ServerClient::new(&network.bind_address, network.port)?;
    let reply = client
        .chat(query)
        .await
        .with_context(|| format!("Is the service running at {}?", client.base_url()))?;

    println!("{}", reply.response);

    let mut meta = format!("source: {}", reply.source);
    if let Some(confidence) = reply.confidence {
        meta.push_str(&format!(", confidence: {}", confidence));
    }
    println!("{}", meta.dimmed());

    Ok(())
}
