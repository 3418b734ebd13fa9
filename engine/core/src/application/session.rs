// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Interactive single-user session: greet, then listen → route → respond
//! until the user says goodbye or the input closes.

use crate::application::chat_service::ChatService;
use crate::domain::{InputBoundary, ListenOutcome, OutputBoundary};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub const GREETING: &str = "Hello! I'm your assistant. How can I help you today?";
pub const FAREWELL: &str = "Goodbye! Have a great day!";
pub const NOTHING_HEARD: &str = "Sorry, I didn't hear anything. Please try again.";
pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't catch that. Could you please repeat?";

const EXIT_WORDS: &[&str] = &["quit", "exit", "goodbye", "bye"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    Ended,
}

pub fn is_exit(text: &str) -> bool {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| EXIT_WORDS.contains(&word))
}

pub struct ConversationSession {
    service: Arc<ChatService>,
    input: Arc<dyn InputBoundary>,
    output: Arc<dyn OutputBoundary>,
    listen_timeout: Duration,
}

impl ConversationSession {
    pub fn new(
        service: Arc<ChatService>,
        input: Arc<dyn InputBoundary>,
        output: Arc<dyn OutputBoundary>,
        listen_timeout: Duration,
    ) -> Self {
        Self {
            service,
            input,
            output,
            listen_timeout,
        }
    }

    async fn listen(&self) -> ListenOutcome {
        tokio::time::timeout(self.listen_timeout, self.input.listen(self.listen_timeout))
            .await
            .unwrap_or(ListenOutcome::TimedOut)
    }

    /// Run one listen → respond cycle.
    pub async fn turn(&self) -> TurnOutcome {
        let text = match self.listen().await {
            ListenOutcome::Heard(text) if !text.trim().is_empty() => text,
            ListenOutcome::Heard(_) | ListenOutcome::Unintelligible => {
                self.output.speak(NOT_UNDERSTOOD).await;
                return TurnOutcome::Continue;
            }
            ListenOutcome::TimedOut => {
                self.output.speak(NOTHING_HEARD).await;
                return TurnOutcome::Continue;
            }
            ListenOutcome::Closed => {
                debug!("Input closed");
                return TurnOutcome::Ended;
            }
        };

        if is_exit(&text) {
            self.output.speak(FAREWELL).await;
            return TurnOutcome::Ended;
        }

        let reply = self
            .service
            .converse(&text, self.input.as_ref(), self.output.as_ref())
            .await;
        self.output.speak(&reply).await;
        TurnOutcome::Continue
    }

    /// Greet and keep taking turns until the session ends. Returns the number
    /// of turns taken.
    pub async fn run(&self) -> usize {
        info!("Conversation session started");
        self.output.speak(GREETING).await;

        let mut turns = 0;
        loop {
            turns += 1;
            if self.turn().await == TurnOutcome::Ended {
                break;
            }
        }

        info!(turns, "Conversation session ended");
        turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_words() {
        assert!(is_exit("bye"));
        assert!(is_exit("OK, Goodbye!"));
        assert!(is_exit("please quit now"));
        assert!(!is_exit("maybe later"));
        assert!(!is_exit("exiting the building"));
    }
}
