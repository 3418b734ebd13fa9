// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Intents, handler requests and replies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Weather,
    Time,
    News,
    Wikipedia,
    Local,
}

impl ResponseSource {
    /// External sources may never be committed to the knowledge base.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::Weather | Self::News | Self::Wikipedia)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weather" => Some(Self::Weather),
            "time" => Some(Self::Time),
            "news" => Some(Self::News),
            "wikipedia" | "wiki" => Some(Self::Wikipedia),
            "local" => Some(Self::Local),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Time => "time",
            Self::News => "news",
            Self::Wikipedia => "wikipedia",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specialized handler families, in routing priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Weather,
    Time,
    News,
    Encyclopedia,
}

impl Intent {
    pub fn source(&self) -> ResponseSource {
        match self {
            Self::Weather => ResponseSource::Weather,
            Self::Time => ResponseSource::Time,
            Self::News => ResponseSource::News,
            Self::Encyclopedia => ResponseSource::Wikipedia,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Time => "time",
            Self::News => "news",
            Self::Encyclopedia => "encyclopedia",
        }
    }
}

/// Fixed news request signatures, one per trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewsTopic {
    Business,
    Tech,
    Domains,
    Apple,
    Tesla,
}

impl NewsTopic {
    /// Cache key for this topic.
    pub fn signature(&self) -> &'static str {
        match self {
            Self::Business => "news:business",
            Self::Tech => "news:tech",
            Self::Domains => "news:domains",
            Self::Apple => "news:apple",
            Self::Tesla => "news:tesla",
        }
    }
}

/// What a matched trigger asks its handler to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentRequest {
    /// `city` is `None` when the utterance mentions weather without a
    /// "weather in <city>" phrase.
    Weather { city: Option<String> },
    Time,
    News(NewsTopic),
    /// `topic` may be empty when only the trigger word was given.
    Encyclopedia { topic: String },
}

impl IntentRequest {
    pub fn intent(&self) -> Intent {
        match self {
            Self::Weather { .. } => Intent::Weather,
            Self::Time => Intent::Time,
            Self::News(_) => Intent::News,
            Self::Encyclopedia { .. } => Intent::Encyclopedia,
        }
    }
}

/// Text answer for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub source: ResponseSource,
    /// Overlap score for knowledge base matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u32>,
}

impl Reply {
    pub fn new(text: impl Into<String>, source: ResponseSource) -> Self {
        Self {
            text: text.into(),
            source,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: u32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Router verdict for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Answered(Reply),
    /// No trigger matched and the knowledge base had nothing with a usable
    /// score. Triggers the learning loop in interactive mode.
    NoMatch,
}

/// A specialized handler. Always produces user-facing text: internal failures
/// become fixed apology strings.
#[async_trait]
pub trait IntentHandler: Send + Sync {
    fn intent(&self) -> Intent;

    async fn handle(&self, request: &IntentRequest) -> String;
}
