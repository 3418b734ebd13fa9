// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod chat_service;
pub mod engine_factory;
pub mod knowledge_base;
pub mod learning;
pub mod matcher;
pub mod router;
pub mod session;

pub use chat_service::{ChatService, TrainOutcome, TrainingError, TrainingRequest};
pub use engine_factory::{build_engine, build_engine_with, Engine};
pub use knowledge_base::KnowledgeBase;
pub use learning::{LearningLoop, LearningOutcome};
pub use matcher::{MatchResult, Matcher};
pub use router::{classify, IntentRouter};
pub use session::{ConversationSession, TurnOutcome};
