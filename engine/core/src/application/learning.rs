// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Learning Loop
//!
//! Runs after a miss: asks the user for the answer, waits for one reply with
//! a timeout, and commits `{original query, reply}` to the knowledge base.

use crate::application::knowledge_base::KnowledgeBase;
use crate::domain::{InputBoundary, KnowledgeEntry, ListenOutcome, OutputBoundary};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const PROMPT: &str = "I don't know the answer to that. Can you give me the correct response?";
pub const CONFIRMATION: &str = "Thank you! I've learned something new.";
pub const NO_REPLY: &str = "I'm not sure how to respond to that. Could you rephrase it?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningOutcome {
    /// Entry committed. `persisted` is false when only the in-memory copy
    /// was updated.
    Learned { persisted: bool },
    /// No usable reply; nothing was changed.
    NoReply,
}

impl LearningOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Learned { .. } => CONFIRMATION,
            Self::NoReply => NO_REPLY,
        }
    }
}

pub struct LearningLoop {
    knowledge: Arc<KnowledgeBase>,
    timeout: Duration,
}

impl LearningLoop {
    pub fn new(knowledge: Arc<KnowledgeBase>, timeout: Duration) -> Self {
        Self { knowledge, timeout }
    }

    pub async fn run(
        &self,
        original_query: &str,
        input: &dyn InputBoundary,
        output: &dyn OutputBoundary,
    ) -> LearningOutcome {
        output.speak(PROMPT).await;

        // Bound the wait even if the boundary ignores its own timeout
        let heard = match tokio::time::timeout(self.timeout, input.listen(self.timeout)).await {
            Ok(ListenOutcome::Heard(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(outcome) => {
                info!(?outcome, "No answer given, nothing learned");
                return LearningOutcome::NoReply;
            }
            Err(_) => {
                info!(timeout_secs = self.timeout.as_secs(), "Timed out waiting for an answer");
                return LearningOutcome::NoReply;
            }
        };

        let entry = KnowledgeEntry::new(original_query, heard);
        match self.knowledge.append(entry).await {
            Ok(()) => LearningOutcome::Learned { persisted: true },
            Err(e) => {
                warn!(error = %e, "Learned entry kept in memory only");
                LearningOutcome::Learned { persisted: false }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed_entries;
    use crate::infrastructure::InMemoryKnowledgeStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    struct ScriptedInput {
        outcomes: Mutex<VecDeque<ListenOutcome>>,
    }

    impl ScriptedInput {
        fn new(outcomes: Vec<ListenOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
            }
        }
    }

    #[async_trait]
    impl InputBoundary for ScriptedInput {
        async fn listen(&self, _timeout: Duration) -> ListenOutcome {
            self.outcomes.lock().pop_front().unwrap_or(ListenOutcome::Closed)
        }
    }

    struct SilentInput;

    #[async_trait]
    impl InputBoundary for SilentInput {
        async fn listen(&self, _timeout: Duration) -> ListenOutcome {
            std::future::pending::<()>().await;
            ListenOutcome::Closed
        }
    }

    #[derive(Default)]
    struct RecordingOutput {
        spoken: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl OutputBoundary for RecordingOutput {
        async fn speak(&self, text: &str) {
            self.spoken.lock().push(text.to_string());
        }
    }

    fn knowledge() -> (Arc<InMemoryKnowledgeStore>, Arc<KnowledgeBase>) {
        let store = Arc::new(InMemoryKnowledgeStore::with_entries(seed_entries()));
        let kb = Arc::new(KnowledgeBase::from_entries(store.clone(), seed_entries()));
        (store, kb)
    }

    #[tokio::test]
    async fn test_reply_is_committed_with_original_query() {
        let (store, kb) = knowledge();
        let learning = LearningLoop::new(kb.clone(), Duration::from_secs(5));
        let input = ScriptedInput::new(vec![ListenOutcome::Heard("blue".to_string())]);
        let output = RecordingOutput::default();

        let outcome = learning.run("What's my Favorite Color?", &input, &output).await;

        assert_eq!(outcome, LearningOutcome::Learned { persisted: true });
        assert_eq!(outcome.message(), CONFIRMATION);
        assert_eq!(*output.spoken.lock(), vec![PROMPT.to_string()]);
        let last = kb.all().last().cloned().unwrap();
        assert_eq!(last, KnowledgeEntry::new("What's my Favorite Color?", "blue"));
        assert_eq!(store.snapshot().map(|e| e.len()), Some(6));
    }

    #[tokio::test]
    async fn test_unintelligible_reply_changes_nothing() {
        let (_, kb) = knowledge();
        let learning = LearningLoop::new(kb.clone(), Duration::from_secs(5));

        for outcome in [
            ListenOutcome::Unintelligible,
            ListenOutcome::TimedOut,
            ListenOutcome::Heard("   ".to_string()),
        ] {
            let input = ScriptedInput::new(vec![outcome]);
            let result = learning.run("banana", &input, &RecordingOutput::default()).await;
            assert_eq!(result, LearningOutcome::NoReply);
            assert_eq!(result.message(), NO_REPLY);
        }
        assert_eq!(kb.len(), 5);
    }

    #[tokio::test]
    async fn test_silent_input_times_out() {
        let (_, kb) = knowledge();
        let learning = LearningLoop::new(kb.clone(), Duration::from_millis(50));

        let result = learning
            .run("banana", &SilentInput, &RecordingOutput::default())
            .await;
        assert_eq!(result, LearningOutcome::NoReply);
        assert_eq!(kb.len(), 5);
    }

    #[tokio::test]
    async fn test_persist_failure_still_learns_in_memory() {
        let (store, kb) = knowledge();
        store.set_fail_writes(true);
        let learning = LearningLoop::new(kb.clone(), Duration::from_secs(5));
        let input = ScriptedInput::new(vec![ListenOutcome::Heard("blue".to_string())]);

        let result = learning.run("favorite color", &input, &RecordingOutput::default()).await;
        assert_eq!(result, LearningOutcome::Learned { persisted: false });
        assert_eq!(kb.len(), 6);
    }
}
