//! Contracts toward the host environment.

use crate::errors::Result;
use crate::scheduler::{ConnectivityStatus, ScheduledJob};

/// Reports the current network state.
pub trait ConnectivityTrait: Send + Sync {
    fn status(&self) -> ConnectivityStatus;
}

/// The job facility that drives background work.
///
/// The facility owns timing and constraint enforcement; the scheduler
/// only registers, cancels and reports. Job names identify singleton
/// slots: at most one job per name may be pending.
pub trait JobFacilityTrait: Send + Sync {
    /// Register a job, honoring its [`ExistingJobPolicy`]
    /// (`Keep` leaves a pending job with the same name untouched,
    /// `Replace` supersedes it).
    ///
    /// [`ExistingJobPolicy`]: crate::scheduler::ExistingJobPolicy
    fn schedule(&self, job: ScheduledJob) -> Result<()>;

    /// Remove the named job if present.
    fn cancel(&self, job_name: &str);

    /// Whether a job with the given name is pending.
    fn is_pending(&self, job_name: &str) -> bool;

    /// Completion report from the job's unit of work. `needs_retry`
    /// asks the facility to re-run the job with back-off; `false` is a
    /// terminal completion.
    fn report_result(&self, job_name: &str, needs_retry: bool);
}
