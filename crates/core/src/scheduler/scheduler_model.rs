//! Scheduling domain models.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_REFRESH_INTERVAL_SECS;

/// Network requirement attached to a scheduled job.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NetworkConstraint {
    /// The job can run without any network.
    None,
    /// Any connected network will do.
    Any,
    /// Only run while on an unmetered network.
    UnmeteredOnly,
}

/// What to do when a job with the same name is already pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingJobPolicy {
    /// Leave the pending job untouched.
    Keep,
    /// Replace the pending job with the new request.
    Replace,
}

/// Connectivity as reported by the host environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectivityStatus {
    pub connected: bool,
    pub metered: bool,
}

/// The policy inputs for one scheduling decision.
///
/// Read from persisted configuration before each decision; mutated only
/// by user settings changes or a provider switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub interval_seconds: u32,
    pub unmetered_only: bool,
    pub requires_network: bool,
    /// Provider-supplied minimum interval. 0 = no override,
    /// `u32::MAX` = never refresh automatically.
    pub minimum_provider_interval: u32,
}

impl RefreshPolicy {
    /// The interval actually used for scheduling: the provider override
    /// when present, otherwise the user interval, floored at 60 s.
    pub fn effective_interval(&self) -> u32 {
        let base = if self.minimum_provider_interval > 0 {
            self.minimum_provider_interval
        } else {
            self.interval_seconds
        };
        base.max(MIN_REFRESH_INTERVAL_SECS)
    }

    /// Whether the provider opted out of automatic refresh entirely.
    pub fn never_auto_refresh(&self) -> bool {
        self.minimum_provider_interval == u32::MAX
    }
}

/// A request to (re)register the singleton refresh job.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub name: String,
    pub delay_secs: u64,
    pub constraint: NetworkConstraint,
    pub existing: ExistingJobPolicy,
}
