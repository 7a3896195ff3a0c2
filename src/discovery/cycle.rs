//! One discovery pass: sample node pairs, record strong ones as relationships,
//! then write project summaries.

use anyhow::{Context as _, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use super::lock_db;
use super::scorer::{sample_pairs, HeuristicScorer, RelationshipScorer};
use super::summary::{create_project_summaries, SummaryOptions};
use crate::config::DiscoveryConfig;
use crate::memory::relations::put_relationship;
use crate::memory::search::search_nodes;
use crate::memory::stats::graph_stats;
use crate::memory::types::{timestamp_now, MemoryRelationship};

/// What a single cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// The store had fewer than two nodes, so nothing ran.
    pub skipped: bool,
    pub node_count: u64,
    pub pairs_scored: usize,
    /// Pairs scoring above the threshold.
    pub relationships_found: usize,
    pub relationships_persisted: usize,
    pub summaries_created: usize,
}

/// A unit of background work the scheduler can run repeatedly.
///
/// Synchronous on purpose: the scheduler moves each call onto the blocking pool.
pub trait DiscoveryCycle: Send + Sync + 'static {
    fn run_cycle(&self) -> Result<CycleReport>;
}

/// Production discovery cycle over a shared store.
pub struct Discovery {
    db: Arc<Mutex<Connection>>,
    config: DiscoveryConfig,
    scorer: Box<dyn RelationshipScorer>,
    rng: Mutex<StdRng>,
}

impl Discovery {
    /// Heuristic scorer; RNG seeded from `config.seed` or from entropy.
    pub fn new(db: Arc<Mutex<Connection>>, config: DiscoveryConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            db,
            config,
            scorer: Box::new(HeuristicScorer),
            rng: Mutex::new(rng),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn RelationshipScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    fn discover_relationships(&self, report: &mut CycleReport) -> Result<()> {
        let nodes = {
            let conn = lock_db(&self.db)?;
            search_nodes(&conn, "", self.config.sample_size)
                .context("failed to load discovery working set")?
        };

        let pairs = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| anyhow::anyhow!("rng lock poisoned: {e}"))?;
            sample_pairs(nodes.len(), self.config.max_pairs, &mut *rng)
        };

        let mut found = Vec::new();
        for (i, j) in pairs {
            let (a, b) = (&nodes[i], &nodes[j]);
            let scored = self
                .scorer
                .score(a, b)
                .with_context(|| format!("failed to score pair {} / {}", a.id, b.id))?;
            report.pairs_scored += 1;

            if scored.is_candidate(self.config.score_threshold) {
                tracing::info!(
                    from = %a.id,
                    to = %b.id,
                    score = scored.score,
                    relationship_type = %scored.relationship_type,
                    "relationship discovered"
                );
                found.push(MemoryRelationship {
                    from_node_id: a.id.clone(),
                    to_node_id: b.id.clone(),
                    weight: scored.score,
                    relationship_type: scored.relationship_type,
                    created_at: timestamp_now(),
                });
            }
        }
        report.relationships_found = found.len();

        if self.config.persist_relationships && !found.is_empty() {
            let conn = lock_db(&self.db)?;
            for relationship in &found {
                put_relationship(&conn, relationship).context("failed to persist relationship")?;
                report.relationships_persisted += 1;
            }
        }

        Ok(())
    }
}

impl DiscoveryCycle for Discovery {
    fn run_cycle(&self) -> Result<CycleReport> {
        let stats = {
            let conn = lock_db(&self.db)?;
            graph_stats(&conn).context("failed to read graph stats")?
        };

        let mut report = CycleReport {
            node_count: stats.node_count,
            ..Default::default()
        };

        if stats.node_count < 2 {
            tracing::debug!(node_count = stats.node_count, "not enough memories for discovery");
            report.skipped = true;
            return Ok(report);
        }

        self.discover_relationships(&mut report)?;

        let summaries = create_project_summaries(
            &self.db,
            SummaryOptions {
                sample_size: self.config.summary_sample_size,
                min_group_size: self.config.summary_min_group_size,
            },
        )?;
        report.summaries_created = summaries.summaries_created;

        // Priorities stay at their stored values; nothing recomputes them yet.
        tracing::debug!("priority update: no-op");

        tracing::info!(
            nodes = report.node_count,
            pairs = report.pairs_scored,
            found = report.relationships_found,
            summaries = report.summaries_created,
            "discovery cycle complete"
        );
        Ok(report)
    }
}
