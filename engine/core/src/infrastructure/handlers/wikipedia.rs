// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Wikipedia Handler
//
// Page summaries from the Wikipedia REST API
// (`{endpoint}/page/summary/{topic}`).

use super::{fetch_ok, record_failure};
use crate::domain::{FetchError, Fetcher, Intent, IntentHandler, IntentRequest};
use crate::infrastructure::cache::TtlCache;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

pub const NO_TOPIC: &str = "Please specify what you want to search for.";
pub const NO_INFORMATION: &str = "No information available.";
pub const TIMEOUT_APOLOGY: &str = "Request timed out. Please try again later.";
pub const APOLOGY: &str = "Sorry, I couldn't fetch Wikipedia data at the moment.";

#[derive(Deserialize)]
struct SummaryResponse {
    extract: Option<String>,
    description: Option<String>,
}

impl SummaryResponse {
    fn into_text(self) -> String {
        [self.extract, self.description]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
            .unwrap_or_else(|| NO_INFORMATION.to_string())
    }
}

pub struct WikipediaHandler {
    fetcher: Arc<dyn Fetcher>,
    cache: Arc<TtlCache>,
    endpoint: Url,
}

impl WikipediaHandler {
    pub fn new(fetcher: Arc<dyn Fetcher>, cache: Arc<TtlCache>, endpoint: Url) -> Self {
        Self {
            fetcher,
            cache,
            endpoint,
        }
    }

    fn request_url(&self, topic: &str) -> Result<Url, FetchError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Network(format!("invalid wikipedia endpoint: {}", self.endpoint)))?
            .pop_if_empty()
            .extend(["page", "summary", topic]);
        Ok(url)
    }

    async fn lookup(&self, topic: &str) -> Result<String, FetchError> {
        let response = fetch_ok(self.fetcher.as_ref(), self.request_url(topic)?).await?;
        let summary: SummaryResponse = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        Ok(summary.into_text())
    }
}

#[async_trait]
impl IntentHandler for WikipediaHandler {
    fn intent(&self) -> Intent {
        Intent::Encyclopedia
    }

    async fn handle(&self, request: &IntentRequest) -> String {
        let topic = match request {
            IntentRequest::Encyclopedia { topic } if !topic.trim().is_empty() => topic.trim(),
            _ => return NO_TOPIC.to_string(),
        };

        let key = format!("wikipedia:{}", topic);
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        match self.lookup(topic).await {
            Ok(text) => {
                self.cache.set(key, text.clone());
                text
            }
            Err(FetchError::Timeout) => {
                record_failure("wikipedia", &FetchError::Timeout);
                TIMEOUT_APOLOGY.to_string()
            }
            Err(e) => {
                record_failure("wikipedia", &e);
                APOLOGY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::handlers::testing::StubFetcher;
    use std::time::Duration;

    fn handler(fetcher: Arc<StubFetcher>) -> WikipediaHandler {
        WikipediaHandler::new(
            fetcher,
            Arc::new(TtlCache::new(Duration::from_secs(600))),
            Url::parse("https://wiki.test/api/rest_v1").unwrap(),
        )
    }

    fn topic(t: &str) -> IntentRequest {
        IntentRequest::Encyclopedia {
            topic: t.to_string(),
        }
    }

    #[tokio::test]
    async fn test_extract_preferred_and_cached() {
        let fetcher = Arc::new(StubFetcher::ok(
            r#"{"extract": "Rust is a language.", "description": "programming language"}"#,
        ));
        let handler = handler(fetcher.clone());

        assert_eq!(handler.handle(&topic("rust language")).await, "Rust is a language.");
        assert_eq!(
            fetcher.last_url().unwrap(),
            "https://wiki.test/api/rest_v1/page/summary/rust%20language"
        );

        handler.handle(&topic("rust language")).await;
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_description_then_fixed_text() {
        let fetcher = Arc::new(StubFetcher::ok(r#"{"description": "a city"}"#));
        assert_eq!(handler(fetcher).handle(&topic("paris")).await, "a city");

        let fetcher = Arc::new(StubFetcher::ok(r#"{"title": "Nothing"}"#));
        assert_eq!(handler(fetcher).handle(&topic("nothing")).await, NO_INFORMATION);
    }

    #[tokio::test]
    async fn test_empty_topic_prompts_without_fetch() {
        let fetcher = Arc::new(StubFetcher::ok("{}"));
        let handler = handler(fetcher.clone());
        assert_eq!(handler.handle(&topic("")).await, NO_TOPIC);
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_timeout_and_general_failure_are_distinct() {
        let fetcher = Arc::new(StubFetcher::failing(FetchError::Timeout));
        assert_eq!(handler(fetcher).handle(&topic("rust")).await, TIMEOUT_APOLOGY);

        let fetcher = Arc::new(StubFetcher::status(404));
        assert_eq!(handler(fetcher).handle(&topic("rust")).await, APOLOGY);
    }
}
