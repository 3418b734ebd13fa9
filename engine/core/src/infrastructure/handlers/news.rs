// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// News Handler
//
// Top headlines from a NewsAPI-compatible endpoint. Each trigger maps to one
// fixed request; the reply is the first five article titles, one per line.

use super::{fetch_ok, record_failure};
use crate::domain::{FetchError, Fetcher, Intent, IntentHandler, IntentRequest, NewsTopic};
use crate::infrastructure::cache::TtlCache;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

pub const NO_NEWS: &str = "No news available right now.";
pub const APOLOGY: &str = "Sorry, I couldn't fetch the news right now.";

const MAX_HEADLINES: usize = 5;

#[derive(Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Deserialize)]
struct Article {
    title: Option<String>,
}

/// Path and query parameters for a topic, relative to the provider base.
fn topic_request(topic: NewsTopic) -> (&'static str, &'static [(&'static str, &'static str)]) {
    match topic {
        NewsTopic::Business => ("top-headlines", &[("country", "us"), ("category", "business")]),
        NewsTopic::Tech => ("top-headlines", &[("sources", "techcrunch")]),
        NewsTopic::Domains => ("everything", &[("domains", "wsj.com")]),
        NewsTopic::Apple => ("everything", &[("q", "apple"), ("sortBy", "popularity")]),
        NewsTopic::Tesla => ("everything", &[("q", "tesla"), ("sortBy", "publishedAt")]),
    }
}

pub struct NewsHandler {
    fetcher: Arc<dyn Fetcher>,
    cache: Arc<TtlCache>,
    endpoint: Url,
    api_key: Option<String>,
}

impl NewsHandler {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        cache: Arc<TtlCache>,
        endpoint: Url,
        api_key: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            cache,
            endpoint,
            api_key,
        }
    }

    fn request_url(&self, topic: NewsTopic, api_key: &str) -> Result<Url, FetchError> {
        let (path, params) = topic_request(topic);
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Network(format!("invalid news endpoint: {}", self.endpoint)))?
            .pop_if_empty()
            .push(path);
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
            query.append_pair("apiKey", api_key);
        }
        Ok(url)
    }

    async fn lookup(&self, topic: NewsTopic, api_key: &str) -> Result<String, FetchError> {
        let url = self.request_url(topic, api_key)?;
        let response = fetch_ok(self.fetcher.as_ref(), url).await?;
        let data: NewsResponse = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        let titles: Vec<String> = data
            .articles
            .into_iter()
            .filter_map(|a| a.title)
            .take(MAX_HEADLINES)
            .collect();

        if titles.is_empty() {
            Ok(NO_NEWS.to_string())
        } else {
            Ok(titles.join("\n"))
        }
    }
}

#[async_trait]
impl IntentHandler for NewsHandler {
    fn intent(&self) -> Intent {
        Intent::News
    }

    async fn handle(&self, request: &IntentRequest) -> String {
        let IntentRequest::News(topic) = request else {
            return NO_NEWS.to_string();
        };

        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("News API key is not configured");
            return APOLOGY.to_string();
        };

        let key = topic.signature();
        if let Some(cached) = self.cache.get(key) {
            return cached;
        }

        match self.lookup(*topic, api_key).await {
            Ok(headlines) => {
                self.cache.set(key, headlines.clone());
                headlines
            }
            Err(e) => {
                record_failure("news", &e);
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

    fn handler(fetcher: Arc<StubFetcher>) -> NewsHandler {
        NewsHandler::new(
            fetcher,
            Arc::new(TtlCache::new(Duration::from_secs(600))),
            Url::parse("https://news.test/v2").unwrap(),
            Some("secret".to_string()),
        )
    }

    fn articles(count: usize) -> String {
        let items: Vec<String> = (1..=count)
            .map(|i| format!(r#"{{"title": "Headline {}"}}"#, i))
            .collect();
        format!(r#"{{"status": "ok", "articles": [{}]}}"#, items.join(","))
    }

    #[tokio::test]
    async fn test_top_five_titles_joined_by_newlines() {
        let fetcher = Arc::new(StubFetcher::ok(&articles(8)));
        let handler = handler(fetcher.clone());

        let text = handler.handle(&IntentRequest::News(NewsTopic::Tech)).await;
        assert_eq!(text, "Headline 1\nHeadline 2\nHeadline 3\nHeadline 4\nHeadline 5");
        assert_eq!(
            fetcher.last_url().unwrap(),
            "https://news.test/v2/top-headlines?sources=techcrunch&apiKey=secret"
        );
    }

    #[tokio::test]
    async fn test_topic_signatures() {
        let fetcher = Arc::new(StubFetcher::ok(&articles(1)));
        let handler = handler(fetcher.clone());

        handler.handle(&IntentRequest::News(NewsTopic::Business)).await;
        assert!(fetcher.last_url().unwrap().ends_with("top-headlines?country=us&category=business&apiKey=secret"));

        handler.handle(&IntentRequest::News(NewsTopic::Tesla)).await;
        assert!(fetcher.last_url().unwrap().ends_with("everything?q=tesla&sortBy=publishedAt&apiKey=secret"));

        // Same topic again is served from cache
        handler.handle(&IntentRequest::News(NewsTopic::Business)).await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_list() {
        let fetcher = Arc::new(StubFetcher::ok(r#"{"articles": []}"#));
        let handler = handler(fetcher);
        assert_eq!(handler.handle(&IntentRequest::News(NewsTopic::Apple)).await, NO_NEWS);
    }

    #[tokio::test]
    async fn test_failure_apologizes_and_is_not_cached() {
        let fetcher = Arc::new(StubFetcher::failing(FetchError::Timeout));
        let handler = handler(fetcher.clone());

        assert_eq!(handler.handle(&IntentRequest::News(NewsTopic::Domains)).await, APOLOGY);
        assert_eq!(handler.handle(&IntentRequest::News(NewsTopic::Domains)).await, APOLOGY);
        assert_eq!(fetcher.calls(), 2);
    }
}
