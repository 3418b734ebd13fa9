// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod cache;
pub mod handlers;
pub mod http_fetcher;
pub mod knowledge_store;
pub mod normalizer;

pub use cache::TtlCache;
pub use http_fetcher::HttpFetcher;
pub use knowledge_store::{InMemoryKnowledgeStore, JsonFileKnowledgeStore};
pub use normalizer::TextNormalizer;
