//! Pair scoring and pair sampling.
//!
//! The heuristic score sums three bounded signals, then clamps to 1.0:
//!
//! | Signal | Contribution |
//! |--------|--------------|
//! | Each shared context key with equal values | +0.2 |
//! | Word-set Jaccard similarity of the contents | `jaccard * 0.5` |
//! | Creation timestamps less than 24h apart | +0.1 |

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::memory::types::{MemoryNode, RelationshipType};

const CONTEXT_MATCH_WEIGHT: f64 = 0.2;
const CONTENT_WEIGHT: f64 = 0.5;
const TEMPORAL_BONUS: f64 = 0.1;
const TEMPORAL_WINDOW_SECS: i64 = 24 * 60 * 60;

/// Score and category for a node pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    /// Similarity in `[0.0, 1.0]`.
    pub score: f64,
    pub relationship_type: RelationshipType,
}

impl PairScore {
    /// Whether the pair is strong enough to become a relationship.
    pub fn is_candidate(&self, threshold: f64) -> bool {
        self.score > threshold
    }
}

/// Computes a similarity score and relationship category for two nodes.
pub trait RelationshipScorer: Send + Sync {
    fn score(&self, a: &MemoryNode, b: &MemoryNode) -> Result<PairScore>;
}

/// Context, content, and temporal overlap scorer.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicScorer;

impl RelationshipScorer for HeuristicScorer {
    fn score(&self, a: &MemoryNode, b: &MemoryNode) -> Result<PairScore> {
        Ok(PairScore {
            score: score_pair(a, b),
            relationship_type: classify_pair(a, b),
        })
    }
}

/// Heuristic similarity of two nodes, symmetric and within `[0.0, 1.0]`.
pub fn score_pair(a: &MemoryNode, b: &MemoryNode) -> f64 {
    let mut score = 0.0;

    for (key, value) in &a.context {
        if b.context.get(key) == Some(value) {
            score += CONTEXT_MATCH_WEIGHT;
        }
    }

    score += jaccard(&word_set(&a.content), &word_set(&b.content)) * CONTENT_WEIGHT;

    if created_within_window(a, b) {
        score += TEMPORAL_BONUS;
    }

    score.min(1.0)
}

/// Relationship category: shared project, then shared type, else semantic.
pub fn classify_pair(a: &MemoryNode, b: &MemoryNode) -> RelationshipType {
    if shares_value(a, b, "project") {
        RelationshipType::ProjectRelated
    } else if shares_value(a, b, "type") {
        RelationshipType::TypeSimilar
    } else {
        RelationshipType::Semantic
    }
}

fn shares_value(a: &MemoryNode, b: &MemoryNode, key: &str) -> bool {
    match (a.context_value(key), b.context_value(key)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Lowercased whitespace-separated words.
pub fn word_set(content: &str) -> HashSet<String> {
    content.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// `|a ∩ b| / |a ∪ b|`, or 0 when the union is empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn created_within_window(a: &MemoryNode, b: &MemoryNode) -> bool {
    let parse = |s: &str| chrono::DateTime::parse_from_rfc3339(s).ok();
    match (parse(&a.created_at), parse(&b.created_at)) {
        (Some(ta), Some(tb)) => (ta - tb).num_seconds().abs() < TEMPORAL_WINDOW_SECS,
        _ => false,
    }
}

/// Draw up to `max_pairs` distinct unordered index pairs `(i, j)`, `i < j`, from `0..n`.
pub fn sample_pairs<R: Rng + ?Sized>(n: usize, max_pairs: usize, rng: &mut R) -> Vec<(usize, usize)> {
    let all: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();
    let take = max_pairs.min(all.len());
    all.choose_multiple(rng, take).copied().collect()
}
