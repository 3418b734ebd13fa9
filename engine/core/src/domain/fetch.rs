// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Fetch capability used by the specialized handlers.
//!
//! Anti-corruption layer between the handlers and the HTTP client: handlers
//! build a [`FetchRequest`], the infrastructure performs it and reports either
//! the raw status/body or a failure kind.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: Url,
    /// Per-request limit. `None` uses the fetcher's default.
    pub timeout: Option<Duration>,
}

impl FetchRequest {
    pub fn get(url: Url) -> Self {
        Self { url, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status: HTTP {0}")]
    Status(u16),

    #[error("Malformed response body: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;
}
