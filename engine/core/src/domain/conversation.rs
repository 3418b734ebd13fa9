// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Input and output boundaries of a conversation.
//!
//! Speech capture and synthesis live behind these traits; the engine only
//! sees text.

use async_trait::async_trait;
use std::time::Duration;

/// Result of waiting for one user utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    Heard(String),
    /// Nothing arrived within the wait limit.
    TimedOut,
    /// Something arrived but could not be turned into text.
    Unintelligible,
    /// The input source is gone (end of stream, device removed).
    Closed,
}

#[async_trait]
pub trait InputBoundary: Send + Sync {
    /// Wait at most `timeout` for the next utterance.
    async fn listen(&self, timeout: Duration) -> ListenOutcome;
}

/// Fire-and-forget output. Delivery failures are the implementation's
/// concern and are logged there, never surfaced to the engine.
#[async_trait]
pub trait OutputBoundary: Send + Sync {
    async fn speak(&self, text: &str);
}
