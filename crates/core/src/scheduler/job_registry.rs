//! In-memory job registry.
//!
//! A minimal implementation of the job facility contract: one named
//! slot per job, Keep/Replace semantics, and a linear back-off applied
//! when a run reports `needs_retry`. Hosts with a real OS job facility
//! adapt it behind [`JobFacilityTrait`] instead; this registry backs
//! tests and polling hosts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::constants::LINEAR_BACKOFF_STEP_MS;
use crate::errors::Result;
use crate::scheduler::scheduler_traits::JobFacilityTrait;
use crate::scheduler::{ExistingJobPolicy, ScheduledJob};
use crate::utils::Clock;

/// A registered job and its run bookkeeping.
#[derive(Debug, Clone)]
pub struct JobSlot {
    pub job: ScheduledJob,
    pub next_run_at: DateTime<Utc>,
    /// Retry attempts since the job was (re)registered.
    pub attempts: u32,
}

pub struct InMemoryJobRegistry {
    clock: Arc<dyn Clock>,
    slots: Mutex<HashMap<String, JobSlot>>,
}

impl InMemoryJobRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The slot registered under `job_name`, if any.
    pub fn slot(&self, job_name: &str) -> Option<JobSlot> {
        self.slots.lock().unwrap().get(job_name).cloned()
    }

    /// Jobs whose run time has passed, in no particular order.
    pub fn due_jobs(&self) -> Vec<ScheduledJob> {
        let now = self.clock.now();
        self.slots
            .lock()
            .unwrap()
            .values()
            .filter(|slot| slot.next_run_at <= now)
            .map(|slot| slot.job.clone())
            .collect()
    }
}

impl JobFacilityTrait for InMemoryJobRegistry {
    fn schedule(&self, job: ScheduledJob) -> Result<()> {
        let mut slots = self.slots.lock().unwrap();
        if job.existing == ExistingJobPolicy::Keep && slots.contains_key(&job.name) {
            debug!("Job {} already pending and policy is Keep, ignoring", job.name);
            return Ok(());
        }
        let next_run_at = self.clock.now() + Duration::seconds(job.delay_secs as i64);
        debug!(
            "Registering job {} to run at {} ({:?})",
            job.name, next_run_at, job.constraint
        );
        slots.insert(
            job.name.clone(),
            JobSlot {
                job,
                next_run_at,
                attempts: 0,
            },
        );
        Ok(())
    }

    fn cancel(&self, job_name: &str) {
        if self.slots.lock().unwrap().remove(job_name).is_some() {
            debug!("Canceled job {}", job_name);
        }
    }

    fn is_pending(&self, job_name: &str) -> bool {
        self.slots.lock().unwrap().contains_key(job_name)
    }

    fn report_result(&self, job_name: &str, needs_retry: bool) {
        let mut slots = self.slots.lock().unwrap();
        if !needs_retry {
            slots.remove(job_name);
            return;
        }
        if let Some(slot) = slots.get_mut(job_name) {
            slot.attempts += 1;
            let backoff = Duration::milliseconds(LINEAR_BACKOFF_STEP_MS * slot.attempts as i64);
            slot.next_run_at = self.clock.now() + backoff;
            debug!(
                "Job {} will retry in {} ms (attempt {})",
                job_name,
                backoff.num_milliseconds(),
                slot.attempts
            );
        }
    }
}
