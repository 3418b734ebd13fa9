// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP client for a running Parley service

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use parley_core::presentation::api::{ChatResponse, HealthResponse, TrainResponse};

#[derive(Debug, Clone)]
pub struct ServerClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    query: &'a str,
}

#[derive(Debug, Serialize)]
struct TrainBody<'a> {
    query: &'a str,
    response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ServerClient {
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}:{}", host, port)
        } else {
            format!("http://{}:{}", host, port)
        };
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chat(&self, query: &str) -> Result<ChatResponse> {
        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(&ChatBody { query })
            .send()
            .await
            .context("Failed to reach Parley service")?;

        Self::decode(response, "chat").await
    }

    pub async fn train(
        &self,
        query: &str,
        response: &str,
        source: Option<&str>,
    ) -> Result<TrainResponse> {
        let reply = self
            .client
            .post(format!("{}/train", self.base_url))
            .json(&TrainBody {
                query,
                response,
                source,
            })
            .send()
            .await
            .context("Failed to reach Parley service")?;

        Self::decode(reply, "train").await
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .context("Failed to reach Parley service")?;

        Self::decode(response, "health").await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            anyhow::bail!("{} failed (HTTP {}): {}", operation, status.as_u16(), message);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", operation))
    }
}
