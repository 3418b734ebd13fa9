// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `parley status`: health of a running service

use anyhow::Result;
use colored::Colorize;

use parley_core::domain::config::NetworkConfig;

use crate::server::ServerClient;

pub async fn run(network: &NetworkConfig) -> Result<()> {
    let client = ServerClient::new(&network.bind_address, network.port)?;

    match client.health().await {
        Ok(health) => {
            println!("{}", format!("✓ Parley service is {}", health.status).green());
            println!("  URL: {}", client.base_url());
            println!("  Knowledge entries: {}", health.training_data_size);
            println!("  Uptime: {}", format_uptime(health.uptime_seconds));
            println!("  Checked at: {}", health.timestamp);
        }
        Err(e) => {
            println!("{}", "✗ Parley service is not reachable".red());
            println!("  URL: {}", client.base_url());
            println!("  {}", e.to_string().dimmed());
        }
    }

    Ok(())
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}
