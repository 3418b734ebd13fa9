// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Intent Router
//!
//! Trigger patterns are tried in a fixed priority order; the first one that
//! fires owns the turn. Anything left over goes to the [`Matcher`] over the
//! current knowledge base snapshot.

use crate::application::knowledge_base::KnowledgeBase;
use crate::application::matcher::Matcher;
use crate::domain::{
    Intent, IntentHandler, IntentRequest, NewsTopic, Normalizer, Reply, ResponseSource,
    RouteOutcome, Utterance,
};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::debug;

pub const HANDLER_UNAVAILABLE: &str = "Sorry, I can't help with that right now.";

type Trigger = fn(&Utterance) -> Option<IntentRequest>;

/// Ordered dispatch table. Position is priority.
pub const ROUTES: &[(Intent, Trigger)] = &[
    (Intent::Weather, weather_trigger),
    (Intent::Time, time_trigger),
    (Intent::News, news_trigger),
    (Intent::Encyclopedia, encyclopedia_trigger),
];

// `\w` is Unicode-aware, so "Zürich" and "São" are captured whole
static CITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bweather\s+in\s+(\w+)").expect("city regex")
});

fn weather_trigger(utterance: &Utterance) -> Option<IntentRequest> {
    if !utterance.normalized.contains("weather") {
        return None;
    }
    // "in" is a stopword, so the city is read from the raw text
    let city = CITY_PATTERN
        .captures(&utterance.raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    Some(IntentRequest::Weather { city })
}

fn time_trigger(utterance: &Utterance) -> Option<IntentRequest> {
    let tokens = &utterance.normalized;
    (tokens.contains("time") || tokens.contains("date")).then_some(IntentRequest::Time)
}

fn raw_word(raw: &str, word: &str) -> bool {
    raw.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|w| w == word)
}

fn news_trigger(utterance: &Utterance) -> Option<IntentRequest> {
    let tokens = &utterance.normalized;
    let topic = if tokens.contains_phrase("business news") {
        NewsTopic::Business
    } else if tokens.contains_phrase("tech news") {
        NewsTopic::Tech
    } else if tokens.contains("domains") {
        NewsTopic::Domains
    } else if raw_word(&utterance.raw, "Apple") {
        // Company names are matched on their capitalized form only
        NewsTopic::Apple
    } else if raw_word(&utterance.raw, "Tesla") {
        NewsTopic::Tesla
    } else {
        return None;
    };
    Some(IntentRequest::News(topic))
}

fn encyclopedia_trigger(utterance: &Utterance) -> Option<IntentRequest> {
    let tokens = &utterance.normalized;
    if !(tokens.contains("wikipedia") || tokens.contains("wiki")) {
        return None;
    }
    let topic = tokens
        .tokens()
        .iter()
        .filter(|t| t.as_str() != "wikipedia" && t.as_str() != "wiki")
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    Some(IntentRequest::Encyclopedia { topic })
}

/// First trigger in [`ROUTES`] that fires for `utterance`.
pub fn classify(utterance: &Utterance) -> Option<IntentRequest> {
    ROUTES.iter().find_map(|(_, trigger)| trigger(utterance))
}

pub struct IntentRouter {
    handlers: HashMap<Intent, Arc<dyn IntentHandler>>,
    knowledge: Arc<KnowledgeBase>,
    normalizer: Arc<dyn Normalizer>,
    matcher: Matcher,
}

impl IntentRouter {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        normalizer: Arc<dyn Normalizer>,
        matcher: Matcher,
    ) -> Self {
        Self {
            handlers: HashMap::new(),
            knowledge,
            normalizer,
            matcher,
        }
    }

    /// Register `handler` for the intent it reports. A later registration for
    /// the same intent replaces the earlier one.
    pub fn with_handler(mut self, handler: Arc<dyn IntentHandler>) -> Self {
        self.handlers.insert(handler.intent(), handler);
        self
    }

    pub fn normalizer(&self) -> &dyn Normalizer {
        self.normalizer.as_ref()
    }

    pub fn utterance(&self, raw: &str) -> Utterance {
        Utterance::new(raw, self.normalizer.as_ref())
    }

    pub async fn route(&self, utterance: &Utterance) -> RouteOutcome {
        if let Some(request) = classify(utterance) {
            let intent = request.intent();
            metrics::counter!("parley_route_total", "intent" => intent.as_str()).increment(1);
            debug!(intent = intent.as_str(), "Routed to handler");

            let text = match self.handlers.get(&intent) {
                Some(handler) => handler.handle(&request).await,
                None => {
                    tracing::warn!(intent = intent.as_str(), "No handler registered");
                    HANDLER_UNAVAILABLE.to_string()
                }
            };
            return RouteOutcome::Answered(Reply::new(text, intent.source()));
        }

        let snapshot = self.knowledge.all();
        match self
            .matcher
            .best_match(&utterance.normalized, &snapshot, self.normalizer.as_ref())
        {
            Some(found) => {
                metrics::counter!("parley_route_total", "intent" => "knowledge").increment(1);
                debug!(index = found.index, score = found.score, "Matched knowledge entry");
                RouteOutcome::Answered(
                    Reply::new(found.response, ResponseSource::Local)
                        .with_confidence(found.score),
                )
            }
            None => {
                metrics::counter!("parley_route_total", "intent" => "none").increment(1);
                debug!("No match");
                RouteOutcome::NoMatch
            }
        }
    }
}
