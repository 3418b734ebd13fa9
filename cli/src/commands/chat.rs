// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `parley chat`: interactive console session

use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;

use parley_core::application::{build_engine, ConversationSession};
use parley_core::domain::config::ParleyConfigManifest;

use crate::console::{ConsoleInput, ConsoleOutput};

pub async fn run(config: ParleyConfigManifest) -> Result<()> {
    config
        .validate()
        .context("Configuration validation failed")?;

    let engine = build_engine(&config.spec)
        .await
        .context("Failed to initialize engine")?;

    println!(
        "{}",
        format!(
            "Knowledge base: {} entries ({})",
            engine.knowledge.len(),
            config.spec.knowledge.path.display()
        )
        .dimmed()
    );

    let session = ConversationSession::new(
        engine.service.clone(),
        Arc::new(ConsoleInput::stdin()),
        Arc::new(ConsoleOutput),
        config.spec.listen.timeout(),
    );
    session.run().await;

    Ok(())
}
