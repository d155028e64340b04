//! Refresh scheduling: policy evaluation, delay compensation and the
//! singleton job slot.

mod job_registry;
mod refresh_scheduler;
mod scheduler_model;
mod scheduler_traits;

pub use job_registry::{InMemoryJobRegistry, JobSlot};
pub use refresh_scheduler::RefreshScheduler;
pub use scheduler_model::{
    ConnectivityStatus, ExistingJobPolicy, NetworkConstraint, RefreshPolicy, ScheduledJob,
};
pub use scheduler_traits::{ConnectivityTrait, JobFacilityTrait};
