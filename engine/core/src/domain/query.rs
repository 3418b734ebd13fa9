// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Utterances and their normalized token form.

use std::collections::HashSet;

/// Ordered sequence of significant tokens derived from raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedQuery {
    tokens: Vec<String>,
}

impl NormalizedQuery {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// True if `phrase` (space separated) occurs as consecutive tokens.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        if words.is_empty() || words.len() > self.tokens.len() {
            return false;
        }
        self.tokens
            .windows(words.len())
            .any(|window| window.iter().zip(&words).all(|(t, w)| t == w))
    }

    /// Duplicate tokens collapse; set semantics are what the matcher scores on.
    pub fn token_set(&self) -> HashSet<&str> {
        self.tokens.iter().map(String::as_str).collect()
    }

    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Turns raw text into a canonical token sequence.
///
/// Must be deterministic for identical input within a process.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> NormalizedQuery;
}

/// A single user turn: the raw text plus its normalized form.
///
/// Both are kept because normalization is lossy and some triggers depend on
/// the original casing.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub raw: String,
    pub normalized: NormalizedQuery,
}

impl Utterance {
    pub fn new(raw: impl Into<String>, normalizer: &dyn Normalizer) -> Self {
        let raw = raw.into();
        let normalized = normalizer.normalize(&raw);
        Self { raw, normalized }
    }
}
