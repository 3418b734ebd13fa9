// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Specialized intent handlers.
//!
//! Every handler turns its request into user-facing text. Upstream failures
//! become fixed apology strings and are never cached.

pub mod news;
pub mod time;
pub mod weather;
pub mod wikipedia;

pub use news::NewsHandler;
pub use time::TimeHandler;
pub use weather::WeatherHandler;
pub use wikipedia::WikipediaHandler;

use crate::domain::{FetchError, FetchRequest, FetchResponse, Fetcher};
use url::Url;

/// Fetch `url` and treat any non-2xx status as a failure.
pub(crate) async fn fetch_ok(fetcher: &dyn Fetcher, url: Url) -> Result<FetchResponse, FetchError> {
    let response = fetcher.fetch(FetchRequest::get(url)).await?;
    if response.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Status(response.status))
    }
}

pub(crate) fn record_failure(handler: &'static str, error: &FetchError) {
    metrics::counter!("parley_fetch_failures_total", "handler" => handler).increment(1);
    tracing::warn!(handler, error = %error, "External fetch failed");
}
