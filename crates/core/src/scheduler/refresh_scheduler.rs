//! Decides when the next quote refresh runs and registers it with the
//! job facility.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;

use crate::constants::REFRESH_JOB_NAME;
use crate::errors::Result;
use crate::scheduler::scheduler_traits::{ConnectivityTrait, JobFacilityTrait};
use crate::scheduler::{ExistingJobPolicy, NetworkConstraint, RefreshPolicy, ScheduledJob};
use crate::settings::SettingsServiceTrait;
use crate::utils::Clock;

pub struct RefreshScheduler {
    settings: Arc<dyn SettingsServiceTrait>,
    connectivity: Arc<dyn ConnectivityTrait>,
    jobs: Arc<dyn JobFacilityTrait>,
    clock: Arc<dyn Clock>,
}

impl RefreshScheduler {
    pub fn new(
        settings: Arc<dyn SettingsServiceTrait>,
        connectivity: Arc<dyn ConnectivityTrait>,
        jobs: Arc<dyn JobFacilityTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        RefreshScheduler {
            settings,
            connectivity,
            jobs,
            clock,
        }
    }

    /// Whether a refresh is allowed to run right now under the given
    /// policy and the current connectivity.
    pub fn should_refresh_now(&self, policy: &RefreshPolicy) -> bool {
        // A provider that keeps its data locally can always refresh.
        if !policy.requires_network {
            debug!("should_refresh_now: YES (provider doesn't require network)");
            return true;
        }

        let status = self.connectivity.status();
        if !status.connected {
            debug!("should_refresh_now: NO (not connected)");
            return false;
        }

        if policy.unmetered_only && status.metered {
            debug!("should_refresh_now: NO (can only update on unmetered connections)");
            return false;
        }

        debug!("should_refresh_now: YES");
        true
    }

    /// Delay until the next refresh, compensating for time already
    /// spent since the last successful fetch.
    ///
    /// Across restarts the cumulative inter-fetch gap converges to the
    /// effective interval instead of resetting to the full interval on
    /// every relaunch. A clock set backwards floors the elapsed time at
    /// zero, so at most one fetch is skipped.
    pub fn compute_delay(
        &self,
        policy: &RefreshPolicy,
        last_fetched_at: Option<DateTime<Utc>>,
    ) -> u64 {
        let effective = policy.effective_interval() as i64;
        let elapsed_secs = match last_fetched_at {
            Some(last) => {
                let now = self.clock.now();
                ((now - last).num_milliseconds() / 1000).max(0)
            }
            None => 0,
        };
        (effective - elapsed_secs).max(0) as u64
    }

    /// Register the singleton refresh job.
    ///
    /// With `recreate == false` a pending job is kept as-is (idempotent
    /// scheduling); with `recreate == true` the pending job is replaced
    /// with a fresh delay computed from the latest fetch time. When the
    /// policy forbids refreshing right now, nothing is registered; the
    /// executor re-evaluates connectivity when the facility eventually
    /// runs it.
    pub async fn schedule(&self, recreate: bool) -> Result<()> {
        debug!("schedule called, recreate == {}", recreate);

        let policy = self.settings.refresh_policy().await?;
        if policy.never_auto_refresh() {
            debug!("Provider opted out of automatic refresh, canceling job");
            self.jobs.cancel(REFRESH_JOB_NAME);
            return Ok(());
        }

        if !self.should_refresh_now(&policy) {
            debug!("Should not create work under current conditions, ignoring");
            return Ok(());
        }

        let existing = if recreate {
            ExistingJobPolicy::Replace
        } else {
            ExistingJobPolicy::Keep
        };
        let delay_secs = self.compute_delay(&policy, self.settings.last_fetched_at()?);
        let job = ScheduledJob {
            name: REFRESH_JOB_NAME.to_string(),
            delay_secs,
            constraint: self.network_constraint(&policy),
            existing,
        };
        self.jobs.schedule(job)?;
        debug!("Scheduled quote refresh with delay: {}", delay_secs);
        Ok(())
    }

    /// Remove the singleton refresh job if present.
    pub fn cancel(&self) {
        self.jobs.cancel(REFRESH_JOB_NAME);
    }

    fn network_constraint(&self, policy: &RefreshPolicy) -> NetworkConstraint {
        if !policy.requires_network {
            NetworkConstraint::None
        } else if policy.unmetered_only {
            NetworkConstraint::UnmeteredOnly
        } else {
            NetworkConstraint::Any
        }
    }
}
