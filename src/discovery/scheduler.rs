//! Fixed-interval background loop around a [`DiscoveryCycle`].
//!
//! Each cycle runs on the blocking pool. A failed or panicking cycle is logged
//! and retried after the error backoff; the loop only ends on cancellation.
//! Sleeps race the cancellation token, so [`DiscoveryScheduler::stop`] never
//! waits out an interval. A cycle already in flight is allowed to finish.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::cycle::DiscoveryCycle;
use crate::config::DiscoveryConfig;
use crate::memory::types::timestamp_now;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// Not started, or disabled.
    Idle,
    Running,
    Sleeping,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub interval: Duration,
    pub error_backoff: Duration,
}

impl From<&DiscoveryConfig> for SchedulerConfig {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            enabled: config.enabled,
            interval: config.interval(),
            error_backoff: config.error_backoff(),
        }
    }
}

/// Point-in-time snapshot of the scheduler.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub enabled: bool,
    pub state: SchedulerState,
    pub interval_secs: u64,
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    /// RFC 3339 end time of the last successful cycle.
    pub last_run: Option<String>,
}

#[derive(Default)]
struct Counters {
    completed: AtomicU64,
    failed: AtomicU64,
    last_run: Mutex<Option<String>>,
}

impl Counters {
    fn record_success(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last_run) = self.last_run.lock() {
            *last_run = Some(timestamp_now());
        }
    }

    fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct DiscoveryScheduler<C: DiscoveryCycle> {
    cycle: Arc<C>,
    config: SchedulerConfig,
    state: Arc<watch::Sender<SchedulerState>>,
    counters: Arc<Counters>,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<C: DiscoveryCycle> DiscoveryScheduler<C> {
    pub fn new(cycle: C, config: SchedulerConfig) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            cycle: Arc::new(cycle),
            config,
            state: Arc::new(state),
            counters: Arc::new(Counters::default()),
            cancel: CancellationToken::new(),
            handle: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    pub fn status(&self) -> SchedulerStatus {
        let last_run = self
            .counters
            .last_run
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default();
        SchedulerStatus {
            enabled: self.config.enabled,
            state: self.state(),
            interval_secs: self.config.interval.as_secs(),
            cycles_completed: self.counters.completed.load(Ordering::SeqCst),
            cycles_failed: self.counters.failed.load(Ordering::SeqCst),
            last_run,
        }
    }

    /// Spawn the loop. Returns `false` without spawning when discovery is
    /// disabled, already started, or already stopped.
    pub fn start(&self) -> bool {
        if !self.config.enabled {
            tracing::info!("background discovery disabled");
            return false;
        }
        if self.cancel.is_cancelled() {
            return false;
        }

        let Ok(mut handle) = self.handle.lock() else {
            return false;
        };
        if handle.is_some() {
            return false;
        }

        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            "background discovery started"
        );
        *handle = Some(tokio::spawn(run_loop(
            Arc::clone(&self.cycle),
            self.config,
            Arc::clone(&self.state),
            Arc::clone(&self.counters),
            self.cancel.clone(),
        )));
        true
    }

    /// Cancel the loop, wait for it to exit, then publish `Cancelled`.
    pub async fn stop(&self) {
        self.cancel.cancel();

        let handle = self.handle.lock().ok().and_then(|mut h| h.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "discovery task ended abnormally");
            }
        }

        self.state.send_replace(SchedulerState::Cancelled);
        tracing::info!("background discovery stopped");
    }
}

impl<C: DiscoveryCycle> Drop for DiscoveryScheduler<C> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_loop<C: DiscoveryCycle>(
    cycle: Arc<C>,
    config: SchedulerConfig,
    state: Arc<watch::Sender<SchedulerState>>,
    counters: Arc<Counters>,
    cancel: CancellationToken,
) {
    while !cancel.is_cancelled() {
        state.send_replace(SchedulerState::Running);

        let cycle = Arc::clone(&cycle);
        let outcome = tokio::task::spawn_blocking(move || cycle.run_cycle()).await;

        let delay = match outcome {
            Ok(Ok(report)) => {
                counters.record_success();
                tracing::debug!(skipped = report.skipped, "discovery cycle finished");
                config.interval
            }
            Ok(Err(e)) => {
                counters.record_failure();
                tracing::error!(error = %format!("{e:#}"), "discovery cycle failed");
                config.error_backoff
            }
            Err(e) => {
                counters.record_failure();
                tracing::error!(error = %e, "discovery cycle panicked");
                config.error_backoff
            }
        };

        state.send_replace(SchedulerState::Sleeping);
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
