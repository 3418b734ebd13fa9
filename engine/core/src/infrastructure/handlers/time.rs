// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Local time and date. No external dependency, nothing cached.

use crate::domain::{Intent, IntentHandler, IntentRequest};
use async_trait::async_trait;
use chrono::{DateTime, Local};

#[derive(Debug, Default)]
pub struct TimeHandler;

impl TimeHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn format(now: DateTime<Local>) -> String {
        format!(
            "The current time is {} and the date is {}.",
            now.format("%H:%M:%S"),
            now.format("%Y-%m-%d")
        )
    }
}

#[async_trait]
impl IntentHandler for TimeHandler {
    fn intent(&self) -> Intent {
        Intent::Time
    }

    async fn handle(&self, _request: &IntentRequest) -> String {
        Self::format(Local::now())
    }
}
