// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Weather Handler
//
// Current conditions from an OpenWeatherMap-compatible endpoint, keyed by
// lowercased city name in the shared cache.

use super::{fetch_ok, record_failure};
use crate::domain::{FetchError, Fetcher, Intent, IntentHandler, IntentRequest};
use crate::infrastructure::cache::TtlCache;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

pub const CLARIFICATION: &str = "Please specify a city, like 'weather in London'.";
pub const APOLOGY: &str = "Unable to fetch weather details at the moment.";

#[derive(Deserialize)]
struct WeatherResponse {
    name: String,
    main: MainReadings,
    weather: Vec<Condition>,
    wind: Wind,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
}

#[derive(Deserialize)]
struct Wind {
    speed: f64,
}

pub struct WeatherHandler {
    fetcher: Arc<dyn Fetcher>,
    cache: Arc<TtlCache>,
    endpoint: Url,
    api_key: Option<String>,
}

impl WeatherHandler {
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

    fn request_url(&self, city: &str, api_key: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", city)
            .append_pair("appid", api_key)
            .append_pair("units", "metric");
        url
    }

    async fn lookup(&self, city: &str, api_key: &str) -> Result<String, FetchError> {
        let response = fetch_ok(self.fetcher.as_ref(), self.request_url(city, api_key)).await?;
        let data: WeatherResponse = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        let condition = data
            .weather
            .first()
            .map(|c| c.description.as_str())
            .ok_or_else(|| FetchError::Malformed("missing weather condition".to_string()))?;

        Ok(format!(
            "Current weather in {}:\nTemperature: {}°C\nWeather: {}\nHumidity: {}%\nWind Speed: {} m/s",
            data.name, data.main.temp, condition, data.main.humidity, data.wind.speed
        ))
    }
}

#[async_trait]
impl IntentHandler for WeatherHandler {
    fn intent(&self) -> Intent {
        Intent::Weather
    }

    async fn handle(&self, request: &IntentRequest) -> String {
        let city = match request {
            IntentRequest::Weather { city: Some(city) } if !city.trim().is_empty() => city,
            _ => return CLARIFICATION.to_string(),
        };

        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("Weather API key is not configured");
            return APOLOGY.to_string();
        };

        let key = format!("weather:{}", city.to_lowercase());
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        match self.lookup(city, api_key).await {
            Ok(report) => {
                self.cache.set(key, report.clone());
                report
            }
            Err(e) => {
                record_failure("weather", &e);
                APOLOGY.to_string()
            }
        }
    }
}
