// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// HTTP Fetcher Adapter
//
// reqwest-backed implementation of the Fetcher port used by the
// specialized handlers. Non-2xx responses are returned as-is; the
// handler decides what counts as failure.

use crate::domain::{FetchError, FetchRequest, FetchResponse, Fetcher};
use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with a default per-request `timeout` and a fixed
    /// User-Agent header.
    pub fn new(timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(error.to_string())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let mut builder = self.client.get(request.url.clone());
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(host = request.url.host_str().unwrap_or(""), path = request.url.path(), "Fetching");

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;

        if !(200..300).contains(&status) {
            tracing::warn!(status, host = request.url.host_str().unwrap_or(""), "Upstream returned non-success status");
        }

        Ok(FetchResponse { status, body })
    }
}
