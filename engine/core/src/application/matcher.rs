// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Token-overlap nearest neighbour over the knowledge base.
//!
//! `score(entry) = |Q ∩ normalize(entry.query)|` on token sets. The highest
//! score wins; ties go to the entry inserted first. Entry queries are
//! normalized on every call, which keeps a lookup O(N·K).

use crate::domain::{KnowledgeEntry, NormalizedQuery, Normalizer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Position of the winning entry in knowledge base order.
    pub index: usize,
    pub score: u32,
    pub response: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    min_score: u32,
}

impl Matcher {
    /// `min_score` below 1 is raised to 1: a zero overlap is never a match.
    pub fn new(min_score: u32) -> Self {
        Self {
            min_score: min_score.max(1),
        }
    }

    pub fn min_score(&self) -> u32 {
        self.min_score
    }

    pub fn score(query: &NormalizedQuery, candidate: &NormalizedQuery) -> u32 {
        let candidate = candidate.token_set();
        query
            .token_set()
            .intersection(&candidate)
            .count() as u32
    }

    pub fn best_match(
        &self,
        query: &NormalizedQuery,
        entries: &[KnowledgeEntry],
        normalizer: &dyn Normalizer,
    ) -> Option<MatchResult> {
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(usize, u32)> = None;
        for (index, entry) in entries.iter().enumerate() {
            let score = Self::score(query, &normalizer.normalize(&entry.query));
            // Strict comparison keeps the earliest entry on ties
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((index, score));
            }
        }

        best.filter(|(_, score)| *score >= self.min_score)
            .map(|(index, score)| MatchResult {
                index,
                score,
                response: entries[index].response.clone(),
            })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed_entries;
    use crate::infrastructure::TextNormalizer;

    fn best(matcher: &Matcher, text: &str, entries: &[KnowledgeEntry]) -> Option<MatchResult> {
        let normalizer = TextNormalizer::new();
        matcher.best_match(&normalizer.normalize(text), entries, &normalizer)
    }

    #[test]
    fn test_seed_greeting() {
        let result = best(&Matcher::default(), "hello there", &seed_entries()).unwrap();
        assert_eq!(result.index, 0);
        assert_eq!(result.score, 1);
        assert_eq!(result.response, "Hi! How can I help you today?");
    }

    #[test]
    fn test_zero_overlap_is_no_match() {
        assert_eq!(best(&Matcher::default(), "banana", &seed_entries()), None);
        assert_eq!(best(&Matcher::default(), "banana", &[]), None);
    }

    #[test]
    fn test_tie_goes_to_earliest_entry() {
        let entries = vec![
            KnowledgeEntry::new("red apple", "first"),
            KnowledgeEntry::new("green apple", "second"),
        ];
        let result = best(&Matcher::default(), "apple pie", &entries).unwrap();
        assert_eq!(result.response, "first");
    }

    #[test]
    fn test_higher_overlap_wins_regardless_of_order() {
        let entries = vec![
            KnowledgeEntry::new("apple", "one token"),
            KnowledgeEntry::new("green apple pie", "three tokens"),
        ];
        let result = best(&Matcher::default(), "green apple pie", &entries).unwrap();
        assert_eq!(result.index, 1);
        assert_eq!(result.score, 3);
    }

    #[test]
    fn test_min_score_threshold() {
        let entries = vec![KnowledgeEntry::new("green apple", "two")];
        assert!(best(&Matcher::new(2), "apple", &entries).is_none());
        assert!(best(&Matcher::new(2), "green apple", &entries).is_some());
        assert_eq!(Matcher::new(0).min_score(), 1);
    }

    #[test]
    fn test_deterministic() {
        let entries = seed_entries();
        let matcher = Matcher::default();
        let first = best(&matcher, "what is your name", &entries);
        for _ in 0..10 {
            assert_eq!(best(&matcher, "what is your name", &entries), first);
        }
    }
}
