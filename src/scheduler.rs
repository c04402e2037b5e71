use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::{
    fs,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use crate::{
    configuration::{RUN_LOCK_STALENESS, SCHEDULER_POLL},
    cycle::Executor,
    debug, error,
    events::{EventSink, OrchestratorEvent},
    info,
    inputs::vhosts,
    probes::cache::StatusCache,
    products::{
        activity::{ActivityEntry, EventKind},
        report::CycleReport,
    },
    store::Store,
    tool::certtool::RenewalDriver,
    warn,
};


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Single global run lock record. A lock older than the staleness threshold is
/// treated as abandoned and force-released by the next tick:
pub struct RunLock {
    /// When the lock was taken
    pub acquired_at: DateTime<Utc>,

    /// Who took it
    pub owner: String,
}


#[derive(Debug, Clone, PartialEq)]
/// What a scheduler tick did
pub enum TickOutcome {
    /// A full cycle ran
    Completed(CycleReport),

    /// The tick was a no-op, with the reason why
    Skipped(String),
}


/// Removes the run lock file when dropped, so the lock is released even when
/// the cycle fails mid-way:
#[derive(Debug)]
struct RunLockGuard(PathBuf);


impl Drop for RunLockGuard {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.0) {
            error!("Couldn't release run lock: {}. Error: {err}", self.0.display());
        }
    }
}


/// One scheduler tick: acquire the run lock, run a batch renewal cycle over
/// all managed domains, persist updated statistics, append a summary activity
/// entry and release the lock. An unexpired lock held elsewhere, a disabled
/// master switch or a corrupt policy store all degrade to "skip this cycle,
/// try again next tick":
pub fn tick(
    store: &Store,
    cache: &StatusCache,
    driver: &dyn RenewalDriver,
    executor: &Executor,
    events: &dyn EventSink,
) -> TickOutcome {
    let policy = match store.load_policy() {
        Ok(policy) => policy,
        Err(err) => {
            error!("{err}");
            store.append_activity(&ActivityEntry::system(
                EventKind::ConfigCorrupt,
                &err.to_string(),
            ));
            return skip(store, events, &format!("Policy store unreadable: {err}"));
        }
    };
    if !policy.global_enabled {
        return skip(store, events, "Automatic renewal is disabled globally");
    }

    let _lock = match acquire_run_lock(store) {
        Ok(guard) => guard,
        Err(reason) => return skip(store, events, &reason),
    };

    let domains = vhosts::managed_domains(store);
    let report = executor.run_cycle(store, cache, driver, events, domains, &policy);

    // Reload before updating counters so a settings change made mid-cycle
    // is not clobbered by the stale policy this cycle ran with:
    let mut policy = store.policy();
    let now = Utc::now();
    policy.statistics.checks_performed += 1;
    policy.statistics.renewals_attempted += (report.renewed + report.failed) as u64;
    policy.statistics.renewals_succeeded += report.renewed as u64;
    policy.statistics.renewals_failed += report.failed as u64;
    policy.statistics.last_check = Some(now);
    if report.renewed > 0 {
        policy.statistics.last_renewal = Some(now);
    }
    if let Err(err) = store.save_policy(&policy) {
        error!("Couldn't persist updated statistics: {err}");
    }

    store.append_activity(
        &ActivityEntry::system(
            EventKind::CheckCompleted,
            &format!(
                "Check completed. Checked: {}, eligible: {}, renewed: {}, failed: {}, skipped: {}",
                report.checked, report.eligible, report.renewed, report.failed, report.skipped
            ),
        )
        .with_details(serde_json::json!(report)),
    );
    events.emit(OrchestratorEvent::CheckCompleted { report });
    info!("Cycle report: {}", report.to_string());
    TickOutcome::Completed(report)
}


/// Take the run lock, reclaiming an abandoned one. An unexpired lock held by
/// someone else skips this tick:
fn acquire_run_lock(store: &Store) -> Result<RunLockGuard, String> {
    let path = store.run_lock_path();
    if path.exists() {
        match read_run_lock(&path) {
            Some(lock)
                if Utc::now() - lock.acquired_at
                    < ChronoDuration::seconds(RUN_LOCK_STALENESS as i64) =>
            {
                return Err(format!(
                    "Run lock held by: {} since: {}",
                    lock.owner, lock.acquired_at
                ));
            }
            Some(lock) => {
                warn!(
                    "Reclaiming abandoned run lock held by: {} since: {}",
                    lock.owner, lock.acquired_at
                );
            }
            None => {
                warn!("Unreadable run lock under: {}. Reclaiming", path.display());
            }
        }
        if let Err(err) = fs::remove_file(&path) {
            return Err(format!("Couldn't reclaim run lock: {err}"));
        }
    }
    let lock = RunLock {
        acquired_at: Utc::now(),
        owner: format!("certmoled-{}", std::process::id()),
    };
    let contents = serde_json::to_string(&lock)
        .map_err(|err| format!("Couldn't serialize run lock: {err}"))?;
    fs::write(&path, contents).map_err(|err| format!("Couldn't acquire run lock: {err}"))?;
    debug!("Run lock acquired by: {}", lock.owner);
    Ok(RunLockGuard(path))
}


fn read_run_lock(path: &PathBuf) -> Option<RunLock> {
    fs::read_to_string(path)
        .ok()
        .and_then(|contents| serde_json::from_str(&contents).ok())
}


/// Record and announce a skipped tick:
fn skip(store: &Store, events: &dyn EventSink, reason: &str) -> TickOutcome {
    info!("Check skipped. Reason: {reason}");
    store.append_activity(&ActivityEntry::system(EventKind::CheckSkipped, reason));
    events.emit(OrchestratorEvent::CheckSkipped {
        reason: reason.to_string(),
    });
    TickOutcome::Skipped(reason.to_string())
}


/// Sleep until the next tick is due. The cadence is re-read from the policy
/// every slice, so a frequency change re-arms the timer on the next slice
/// without interrupting anything in progress:
pub fn wait_until_due(store: &Store, last_tick: Instant) {
    loop {
        let interval = store.policy().check_frequency.interval();
        let elapsed = last_tick.elapsed();
        if elapsed >= interval {
            return;
        }
        let remaining = interval - elapsed;
        thread::sleep(remaining.min(Duration::from_secs(SCHEDULER_POLL)));
    }
}
