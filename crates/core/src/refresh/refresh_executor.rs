//! Refresh executor.
//!
//! The unit of work invoked by the job facility. Runs one
//! fetch-and-persist cycle as an explicit state machine
//! (`Idle → Running → {Succeeded, Failed, Cancelled} → Idle`) with a
//! single-flight guard: invoking the executor while a run is in flight
//! is rejected, so no two reschedule decisions for the singleton job
//! are ever made concurrently.

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::{watch, RwLock};

use quotekeeper_providers::ProviderRegistry;

use crate::constants::REFRESH_JOB_NAME;
use crate::errors::Result;
use crate::quote::{QuoteRecord, QuoteStoreTrait};
use crate::scheduler::{JobFacilityTrait, RefreshScheduler};
use crate::settings::SettingsServiceTrait;
use crate::utils::Clock;

/// Executor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl RunState {
    /// The executor's transition table.
    pub fn can_transition(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Idle, Running)
                | (Running, Succeeded)
                | (Running, Failed)
                | (Running, Cancelled)
                | (Succeeded, Idle)
                | (Failed, Idle)
                | (Cancelled, Idle)
        )
    }
}

/// How one invocation of the executor ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Quote fetched and persisted; the next cycle was scheduled.
    Completed,
    /// Fetch failed; the facility was asked to retry with back-off.
    Retry,
    /// An external stop signal ended the run.
    Cancelled,
    /// Policy constraints were not met; nothing ran and no retry budget
    /// was consumed.
    Skipped,
    /// A run was already in flight; this invocation did nothing.
    Rejected,
}

pub struct RefreshExecutor {
    registry: Arc<ProviderRegistry>,
    store: Arc<dyn QuoteStoreTrait>,
    settings: Arc<dyn SettingsServiceTrait>,
    scheduler: Arc<RefreshScheduler>,
    jobs: Arc<dyn JobFacilityTrait>,
    clock: Arc<dyn Clock>,
    state: RwLock<RunState>,
    stop_tx: watch::Sender<bool>,
}

impl RefreshExecutor {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        store: Arc<dyn QuoteStoreTrait>,
        settings: Arc<dyn SettingsServiceTrait>,
        scheduler: Arc<RefreshScheduler>,
        jobs: Arc<dyn JobFacilityTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (stop_tx, _) = watch::channel(false);
        RefreshExecutor {
            registry,
            store,
            settings,
            scheduler,
            jobs,
            clock,
            state: RwLock::new(RunState::Idle),
            stop_tx,
        }
    }

    /// Current executor state.
    pub async fn state(&self) -> RunState {
        *self.state.read().await
    }

    /// Signal the in-flight run to stop. The provider call is aborted
    /// rather than left to finish and write stale data.
    pub fn stop(&self) {
        debug!("Stop requested for refresh run");
        self.stop_tx.send_replace(true);
    }

    /// Run one refresh cycle.
    ///
    /// Invoked by the job facility when the singleton job fires.
    /// Re-entrant invocations are rejected without side effects.
    pub async fn run(&self) -> Result<RunOutcome> {
        {
            let mut state = self.state.write().await;
            if *state == RunState::Running {
                warn!("Refresh already running, rejecting re-entrant invocation");
                return Ok(RunOutcome::Rejected);
            }
            self.transition(&mut state, RunState::Running);
        }
        self.stop_tx.send_replace(false);

        let result = self.run_cycle().await;

        let terminal = match &result {
            Ok(RunOutcome::Completed) => RunState::Succeeded,
            Ok(RunOutcome::Retry) | Err(_) => RunState::Failed,
            Ok(RunOutcome::Cancelled) | Ok(RunOutcome::Skipped) => RunState::Cancelled,
            // Rejection is handled before the state machine starts.
            Ok(RunOutcome::Rejected) => RunState::Cancelled,
        };
        if result.is_err() {
            // Store and scheduling failures are surfaced to the caller,
            // but the facility still gets its retry signal.
            self.jobs.report_result(REFRESH_JOB_NAME, true);
        }
        {
            let mut state = self.state.write().await;
            self.transition(&mut state, terminal);
            self.transition(&mut state, RunState::Idle);
        }
        result
    }

    fn transition(&self, state: &mut RunState, next: RunState) {
        debug_assert!(state.can_transition(next), "{:?} -> {:?}", state, next);
        debug!("Refresh state: {:?} -> {:?}", state, next);
        *state = next;
    }

    async fn run_cycle(&self) -> Result<RunOutcome> {
        let policy = self.settings.refresh_policy().await?;
        if !self.scheduler.should_refresh_now(&policy) {
            debug!("Should not refresh quote now, ignoring");
            return Ok(RunOutcome::Skipped);
        }

        let settings = self.settings.get_settings()?;
        let provider = match self.registry.get(&settings.selected_provider) {
            Ok(provider) => provider,
            Err(e) => {
                error!("Selected provider not available: {}", e);
                self.jobs.report_result(REFRESH_JOB_NAME, true);
                return Ok(RunOutcome::Retry);
            }
        };

        debug!(
            "Attempting to download new quote from {}",
            provider.display_name()
        );
        let mut stop_rx = self.stop_tx.subscribe();
        let fetch = provider.get_quote();
        tokio::pin!(fetch);
        let fetched = loop {
            tokio::select! {
                res = &mut fetch => break res,
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        info!("Aborted quote download");
                        return Ok(RunOutcome::Cancelled);
                    }
                }
            }
        };

        match fetched {
            Ok(quote) if !quote.is_empty() => {
                debug!("Text: {}", quote.text);
                debug!("Source: {}", quote.attribution());
                let record = QuoteRecord {
                    text: quote.text.clone(),
                    source: quote.attribution(),
                    fetched_at: Some(self.clock.now()),
                };
                self.store.save_current_quote(&record).await?;

                // Report terminal success for this invocation first,
                // then register the next cycle with a fresh delay
                // computed from the new fetch time.
                self.jobs.report_result(REFRESH_JOB_NAME, false);
                self.scheduler.schedule(true).await?;
                Ok(RunOutcome::Completed)
            }
            Ok(_) => {
                // Back off instead of scheduling a fresh cycle: a fresh
                // compensated delay right after a failure would be
                // near-zero and produce a fetch storm.
                warn!("Provider returned an empty quote");
                self.jobs.report_result(REFRESH_JOB_NAME, true);
                Ok(RunOutcome::Retry)
            }
            Err(e) => {
                error!("Quote download failed: {}", e);
                self.jobs.report_result(REFRESH_JOB_NAME, true);
                Ok(RunOutcome::Retry)
            }
        }
    }
}
