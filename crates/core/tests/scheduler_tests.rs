//! Integration tests for the refresh scheduler.

mod common;

use std::sync::Arc;

use chrono::Duration;

use quotekeeper_core::constants::*;
use quotekeeper_core::scheduler::{
    InMemoryJobRegistry, JobFacilityTrait, NetworkConstraint, RefreshScheduler,
};
use quotekeeper_core::settings::{SettingsService, SettingsServiceTrait};
use quotekeeper_core::utils::{Clock, ManualClock};
use quotekeeper_providers::ProviderRegistry;

use common::{manual_clock, FakeConnectivity, MemorySettingsRepository};

struct Harness {
    repo: Arc<MemorySettingsRepository>,
    settings: Arc<SettingsService>,
    connectivity: Arc<FakeConnectivity>,
    jobs: Arc<InMemoryJobRegistry>,
    clock: Arc<ManualClock>,
    scheduler: RefreshScheduler,
}

fn harness() -> Harness {
    let repo = MemorySettingsRepository::new();
    let registry = Arc::new(ProviderRegistry::with_defaults());
    let settings = Arc::new(SettingsService::new(repo.clone(), registry));
    let connectivity = FakeConnectivity::new(true, false);
    let clock = manual_clock();
    let jobs = Arc::new(InMemoryJobRegistry::new(clock.clone()));
    let scheduler = RefreshScheduler::new(
        settings.clone(),
        connectivity.clone(),
        jobs.clone(),
        clock.clone(),
    );
    Harness {
        repo,
        settings,
        connectivity,
        jobs,
        clock,
        scheduler,
    }
}

#[tokio::test]
async fn test_short_interval_is_clamped_and_persisted() {
    let h = harness();
    h.repo.put(SETTING_REFRESH_INTERVAL, "10");

    let policy = h.settings.refresh_policy().await.unwrap();
    assert_eq!(policy.interval_seconds, 60);
    assert_eq!(policy.effective_interval(), 60);
    // The clamped value was written back, so repeated calls converge.
    assert_eq!(h.repo.get(SETTING_REFRESH_INTERVAL), Some("60".to_string()));

    let policy = h.settings.refresh_policy().await.unwrap();
    assert_eq!(policy.interval_seconds, 60);
}

#[tokio::test]
async fn test_compute_delay_compensates_for_elapsed_time() {
    let h = harness();
    let policy = h.settings.refresh_policy().await.unwrap();
    let last = h.clock.now() - Duration::seconds(300);
    assert_eq!(h.scheduler.compute_delay(&policy, Some(last)), 600);
}

#[tokio::test]
async fn test_compute_delay_is_zero_after_long_offline_period() {
    let h = harness();
    let policy = h.settings.refresh_policy().await.unwrap();
    let last = h.clock.now() - Duration::seconds(5000);
    assert_eq!(h.scheduler.compute_delay(&policy, Some(last)), 0);
}

#[tokio::test]
async fn test_compute_delay_with_clock_set_backwards() {
    // The last fetch is in the future from the (rewound) clock's point
    // of view; the delay falls back to the full effective interval.
    let h = harness();
    let policy = h.settings.refresh_policy().await.unwrap();
    let last = h.clock.now() + Duration::seconds(500);
    assert_eq!(h.scheduler.compute_delay(&policy, Some(last)), 900);
}

#[tokio::test]
async fn test_compute_delay_without_prior_fetch_uses_full_interval() {
    let h = harness();
    let policy = h.settings.refresh_policy().await.unwrap();
    assert_eq!(h.scheduler.compute_delay(&policy, None), 900);
}

#[tokio::test]
async fn test_schedule_is_idempotent_while_job_pending() {
    let h = harness();
    h.scheduler.schedule(false).await.unwrap();
    let first_run = h.jobs.slot(REFRESH_JOB_NAME).unwrap().next_run_at;

    h.clock.advance(Duration::seconds(120));
    h.scheduler.schedule(false).await.unwrap();

    let slot = h.jobs.slot(REFRESH_JOB_NAME).unwrap();
    assert_eq!(slot.next_run_at, first_run);
    assert!(h.jobs.is_pending(REFRESH_JOB_NAME));
}

#[tokio::test]
async fn test_schedule_with_recreate_replaces_pending_job() {
    let h = harness();
    h.scheduler.schedule(false).await.unwrap();
    let first_run = h.jobs.slot(REFRESH_JOB_NAME).unwrap().next_run_at;

    h.clock.advance(Duration::seconds(120));
    h.repo.put(
        SETTING_LAST_FETCHED_AT,
        &h.clock.now().timestamp_millis().to_string(),
    );
    h.scheduler.schedule(true).await.unwrap();

    let slot = h.jobs.slot(REFRESH_JOB_NAME).unwrap();
    assert_ne!(slot.next_run_at, first_run);
    assert_eq!(slot.next_run_at, h.clock.now() + Duration::seconds(900));
}

#[tokio::test]
async fn test_unmetered_only_on_metered_network_schedules_nothing() {
    let h = harness();
    h.repo.put(SETTING_UNMETERED_ONLY, "true");
    h.connectivity.set(true, true);

    let policy = h.settings.refresh_policy().await.unwrap();
    assert!(!h.scheduler.should_refresh_now(&policy));

    h.scheduler.schedule(false).await.unwrap();
    assert!(!h.jobs.is_pending(REFRESH_JOB_NAME));
}

#[tokio::test]
async fn test_disconnected_network_schedules_nothing() {
    let h = harness();
    h.connectivity.set(false, false);

    h.scheduler.schedule(false).await.unwrap();
    assert!(!h.jobs.is_pending(REFRESH_JOB_NAME));
}

#[tokio::test]
async fn test_offline_provider_ignores_connectivity() {
    let h = harness();
    h.repo.put(SETTING_REQUIRES_NETWORK, "false");
    h.connectivity.set(false, false);

    let policy = h.settings.refresh_policy().await.unwrap();
    assert!(h.scheduler.should_refresh_now(&policy));

    h.scheduler.schedule(false).await.unwrap();
    let slot = h.jobs.slot(REFRESH_JOB_NAME).unwrap();
    assert_eq!(slot.job.constraint, NetworkConstraint::None);
}

#[tokio::test]
async fn test_unmetered_only_constraint_is_passed_to_facility() {
    let h = harness();
    h.repo.put(SETTING_UNMETERED_ONLY, "true");
    h.connectivity.set(true, false);

    h.scheduler.schedule(false).await.unwrap();
    let slot = h.jobs.slot(REFRESH_JOB_NAME).unwrap();
    assert_eq!(slot.job.constraint, NetworkConstraint::UnmeteredOnly);
}

#[tokio::test]
async fn test_never_auto_refresh_cancels_pending_job() {
    let h = harness();
    h.scheduler.schedule(false).await.unwrap();
    assert!(h.jobs.is_pending(REFRESH_JOB_NAME));

    h.repo
        .put(SETTING_REFRESH_INTERVAL_OVERRIDE, &u32::MAX.to_string());
    h.scheduler.schedule(true).await.unwrap();
    assert!(!h.jobs.is_pending(REFRESH_JOB_NAME));
}

#[tokio::test]
async fn test_cancel_removes_singleton_job() {
    let h = harness();
    h.scheduler.schedule(false).await.unwrap();
    assert!(h.jobs.is_pending(REFRESH_JOB_NAME));

    h.scheduler.cancel();
    assert!(!h.jobs.is_pending(REFRESH_JOB_NAME));
}

#[tokio::test]
async fn test_select_provider_persists_derived_policy() {
    let h = harness();
    h.settings.select_provider("fortune").await.unwrap();

    assert_eq!(
        h.repo.get(SETTING_SELECTED_PROVIDER),
        Some("fortune".to_string())
    );
    assert_eq!(
        h.repo.get(SETTING_REQUIRES_NETWORK),
        Some("false".to_string())
    );
    assert_eq!(
        h.repo.get(SETTING_REFRESH_INTERVAL_OVERRIDE),
        Some("0".to_string())
    );
}
