// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Engine Factory - Application Layer
//!
//! Assembles the chat service from configuration: knowledge store, shared
//! cache, fetcher, handlers and router.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Wire concrete infrastructure behind the domain ports

use std::sync::Arc;

use anyhow::Context;
use url::Url;

use crate::application::chat_service::ChatService;
use crate::application::knowledge_base::KnowledgeBase;
use crate::application::learning::LearningLoop;
use crate::application::matcher::Matcher;
use crate::application::router::IntentRouter;
use crate::domain::config::ParleyConfigSpec;
use crate::domain::{Fetcher, KnowledgeStore};
use crate::infrastructure::handlers::{NewsHandler, TimeHandler, WeatherHandler, WikipediaHandler};
use crate::infrastructure::{HttpFetcher, JsonFileKnowledgeStore, TextNormalizer, TtlCache};

/// Fully wired engine. Handles are shared with whatever front end drives it.
pub struct Engine {
    pub service: Arc<ChatService>,
    pub knowledge: Arc<KnowledgeBase>,
    pub cache: Arc<TtlCache>,
}

/// Build the engine with the JSON file store and the HTTP fetcher described by
/// `spec`.
pub async fn build_engine(spec: &ParleyConfigSpec) -> anyhow::Result<Engine> {
    let store: Arc<dyn KnowledgeStore> =
        Arc::new(JsonFileKnowledgeStore::new(spec.knowledge.path.clone()));
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(
        spec.fetch.timeout(),
        &spec.fetch.user_agent,
    )?);
    build_engine_with(spec, store, fetcher).await
}

/// Build the engine around caller-supplied store and fetcher.
pub async fn build_engine_with(
    spec: &ParleyConfigSpec,
    store: Arc<dyn KnowledgeStore>,
    fetcher: Arc<dyn Fetcher>,
) -> anyhow::Result<Engine> {
    let providers = &spec.providers;
    let weather_endpoint = Url::parse(&providers.weather.endpoint)
        .with_context(|| format!("Invalid weather endpoint: {}", providers.weather.endpoint))?;
    let news_endpoint = Url::parse(&providers.news.endpoint)
        .with_context(|| format!("Invalid news endpoint: {}", providers.news.endpoint))?;
    let wikipedia_endpoint = Url::parse(&providers.wikipedia.endpoint)
        .with_context(|| format!("Invalid wikipedia endpoint: {}", providers.wikipedia.endpoint))?;

    let knowledge = Arc::new(KnowledgeBase::load(store).await);
    let cache = Arc::new(TtlCache::new(spec.cache.ttl()));

    let router = IntentRouter::new(
        knowledge.clone(),
        Arc::new(TextNormalizer::new()),
        Matcher::new(spec.matcher.min_score),
    )
    .with_handler(Arc::new(WeatherHandler::new(
        fetcher.clone(),
        cache.clone(),
        weather_endpoint,
        providers.weather.resolve_api_key(),
    )))
    .with_handler(Arc::new(TimeHandler::new()))
    .with_handler(Arc::new(NewsHandler::new(
        fetcher.clone(),
        cache.clone(),
        news_endpoint,
        providers.news.resolve_api_key(),
    )))
    .with_handler(Arc::new(WikipediaHandler::new(
        fetcher,
        cache.clone(),
        wikipedia_endpoint,
    )));

    let learning = LearningLoop::new(knowledge.clone(), spec.listen.timeout());
    let service = Arc::new(ChatService::new(router, knowledge.clone(), learning));

    tracing::info!(
        entries = knowledge.len(),
        cache_ttl_secs = spec.cache.ttl_seconds,
        min_score = spec.matcher.min_score,
        "Engine ready"
    );

    Ok(Engine {
        service,
        knowledge,
        cache,
    })
}
