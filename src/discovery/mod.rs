//! Background discovery: relationship scoring, project summaries, and the
//! cancellable scheduler that runs them.
//!
//! - [`scorer`]: pair similarity and pair sampling
//! - [`summary`]: one summary node per project cluster
//! - [`cycle`]: a single discovery pass over the store
//! - [`scheduler`]: fixed-interval loop with observable state

pub mod cycle;
pub mod scheduler;
pub mod scorer;
pub mod summary;

pub use cycle::{CycleReport, Discovery, DiscoveryCycle};
pub use scheduler::{DiscoveryScheduler, SchedulerConfig, SchedulerState, SchedulerStatus};
pub use scorer::{HeuristicScorer, PairScore, RelationshipScorer};

use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};

/// Lock the shared connection, turning a poisoned lock into an error.
pub(crate) fn lock_db(db: &Mutex<Connection>) -> anyhow::Result<MutexGuard<'_, Connection>> {
    db.lock()
        .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))
}
