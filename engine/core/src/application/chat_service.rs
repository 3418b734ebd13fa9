// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Chat Service
//!
//! Application entry point shared by the interactive session and the HTTP
//! surface. Routes a query, runs the learning loop on a miss when a user is
//! available to teach, and accepts training records.

use crate::application::knowledge_base::KnowledgeBase;
use crate::application::learning::{LearningLoop, LearningOutcome, NO_REPLY};
use crate::application::router::IntentRouter;
use crate::domain::{
    InputBoundary, KnowledgeEntry, OutputBoundary, Reply, ResponseSource, RouteOutcome,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Reply for a miss when nobody can be asked for the answer.
pub const FALLBACK: &str = "I don't understand. Could you rephrase that?";

#[derive(Debug, Clone, Deserialize)]
pub struct TrainingRequest {
    pub query: String,
    pub response: String,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrainOutcome {
    /// False when the entry was accepted in memory but the store rewrite
    /// failed.
    pub persisted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrainingError {
    #[error("Invalid training data format")]
    InvalidFormat,

    #[error("External data cannot be saved to training data")]
    ExternalSource(ResponseSource),
}

pub struct ChatService {
    router: IntentRouter,
    knowledge: Arc<KnowledgeBase>,
    learning: LearningLoop,
}

impl ChatService {
    pub fn new(router: IntentRouter, knowledge: Arc<KnowledgeBase>, learning: LearningLoop) -> Self {
        Self {
            router,
            knowledge,
            learning,
        }
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge
    }

    /// Route one query. Blank input never reaches the router.
    pub async fn respond(&self, raw: &str) -> RouteOutcome {
        if raw.trim().is_empty() {
            return RouteOutcome::NoMatch;
        }
        let utterance = self.router.utterance(raw.trim());
        self.router.route(&utterance).await
    }

    /// Answer one interactive turn, asking the user to teach on a miss.
    pub async fn converse(
        &self,
        raw: &str,
        input: &dyn InputBoundary,
        output: &dyn OutputBoundary,
    ) -> String {
        // Nothing to learn from
        if raw.trim().is_empty() {
            return NO_REPLY.to_string();
        }
        match self.respond(raw).await {
            RouteOutcome::Answered(reply) => reply.text,
            RouteOutcome::NoMatch => {
                let outcome = self.learning.run(raw.trim(), input, output).await;
                if let LearningOutcome::Learned { persisted } = outcome {
                    info!(persisted, "Learned a new response");
                }
                outcome.message().to_string()
            }
        }
    }

    /// Answer without a learning turn: a miss becomes the fixed fallback.
    pub async fn reply_for_service(&self, raw: &str) -> Reply {
        match self.respond(raw).await {
            RouteOutcome::Answered(reply) => reply,
            RouteOutcome::NoMatch => Reply::new(FALLBACK, ResponseSource::Local).with_confidence(0),
        }
    }

    /// Commit a training record. External-source records are rejected
    /// before anything is touched.
    pub async fn train(&self, request: TrainingRequest) -> Result<TrainOutcome, TrainingError> {
        let query = request.query.trim();
        let response = request.response.trim();
        if query.is_empty() || response.is_empty() {
            return Err(TrainingError::InvalidFormat);
        }

        if let Some(source) = request.source.as_deref().and_then(ResponseSource::parse) {
            if source.is_external() {
                tracing::warn!(source = %source, "Rejected training record from external source");
                return Err(TrainingError::ExternalSource(source));
            }
        }

        let persisted = self
            .knowledge
            .append(KnowledgeEntry::new(query, response))
            .await
            .is_ok();
        info!(query, persisted, "Training record added");
        Ok(TrainOutcome { persisted })
    }
}
