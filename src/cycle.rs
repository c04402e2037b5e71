use chrono::Utc;
use std::{
    sync::Mutex,
    thread,
    time::Duration,
};

use crate::{
    configuration::CHUNK_PAUSE_MS,
    debug, eligibility::eligibility,
    error,
    events::{EventSink, OrchestratorEvent},
    info,
    probes::cache::StatusCache,
    products::{
        activity::{ActivityEntry, EventKind},
        failure::RenewalError,
        report::CycleReport,
    },
    states::{
        domain::{DomainRenewalState, DomainStatus, InstallMethod},
        policy::GlobalPolicy,
    },
    store::Store,
    tool::{certtool::RenewalDriver, coordinator::Coordinator},
    warn,
};


#[derive(Debug, Copy, Clone)]
/// Batch renewal executor: orders eligible domains by urgency and drives their
/// renewals through the tool coordinator with a bounded concurrency ceiling
pub struct Executor {
    /// Serialized access to the external tool
    pub coordinator: Coordinator,

    /// Pause between renewal chunks
    pub chunk_pause: Duration,
}


impl Default for Executor {
    fn default() -> Executor {
        Executor {
            coordinator: Coordinator::default(),
            chunk_pause: Duration::from_millis(CHUNK_PAUSE_MS),
        }
    }
}


impl Executor {
    /// Run one renewal cycle over the given domains. Eligibility is evaluated
    /// for every domain, eligible ones are sorted ascending by days until
    /// expiry (domain name as the deterministic tie-break) and processed in
    /// chunks sized by the policy concurrency ceiling. Chunks run with
    /// all-settled semantics: one domain's failure never aborts its siblings.
    /// Skipped domains are logged with their reason and not retried within
    /// the same cycle:
    pub fn run_cycle(
        &self,
        store: &Store,
        cache: &StatusCache,
        driver: &dyn RenewalDriver,
        events: &dyn EventSink,
        domains: Vec<DomainRenewalState>,
        policy: &GlobalPolicy,
    ) -> CycleReport {
        let mut report = CycleReport {
            checked: domains.len(),
            ..CycleReport::default()
        };
        events.emit(OrchestratorEvent::CheckStarted {
            total_domains: domains.len(),
        });

        let now = Utc::now();
        let mut eligible = vec![];
        for state in domains {
            let status = cache.status(&state.domain);
            match eligibility(&state, policy, &status, now) {
                Ok(()) => eligible.push((status.days_left(), state)),
                Err(reason) => {
                    info!("Skipping domain: {}. Reason: {reason}", state.domain);
                    store.append_activity(&ActivityEntry::for_domain(
                        &state.domain,
                        EventKind::RenewalSkipped,
                        &reason.to_string(),
                    ));
                    report.skipped += 1;
                }
            }
        }
        report.eligible = eligible.len();
        events.emit(OrchestratorEvent::CheckAnalysis {
            checked: report.checked,
            eligible: report.eligible,
        });

        // Most urgent first, lexical order on equal expiry:
        eligible.sort_by(|(days_a, state_a), (days_b, state_b)| {
            days_a.cmp(days_b).then(state_a.domain.cmp(&state_b.domain))
        });

        let outcomes = Mutex::new(vec![]);
        for (index, chunk) in eligible.chunks(policy.chunk_size()).enumerate() {
            if index > 0 {
                debug!("Pausing between renewal chunks");
                thread::sleep(self.chunk_pause);
            }
            rayon::scope(|scope| {
                for (days_left, state) in chunk {
                    info!(
                        "Dispatching renewal of domain: {} with {days_left} days left",
                        state.domain
                    );
                    events.emit(OrchestratorEvent::DomainStarted {
                        domain: state.domain.clone(),
                    });
                    store.append_activity(&ActivityEntry::for_domain(
                        &state.domain,
                        EventKind::RenewalStarted,
                        &format!("Renewal attempt started, {days_left} days left"),
                    ));
                    let state = state.clone();
                    let outcomes = &outcomes;
                    scope.spawn(move |_| {
                        let succeeded = self.attempt_renewal(store, cache, driver, events, state);
                        outcomes
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .push(succeeded);
                    });
                }
            });
        }

        for succeeded in outcomes
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
        {
            if succeeded {
                report.renewed += 1;
            } else {
                report.failed += 1;
            }
        }
        report
    }


    /// Attempt one renewal through the tool coordinator and record the outcome
    /// in the domain state, the status cache and the activity log:
    fn attempt_renewal(
        &self,
        store: &Store,
        cache: &StatusCache,
        driver: &dyn RenewalDriver,
        events: &dyn EventSink,
        mut state: DomainRenewalState,
    ) -> bool {
        state.last_renewal_attempt = Some(Utc::now());
        let method = state
            .install_method
            .unwrap_or(InstallMethod::HttpChallenge);
        let domain = state.domain.clone();

        let result = self
            .coordinator
            .with_exclusive_access(&domain, driver, events, || driver.renew(&domain, method));

        match result {
            Ok(()) => {
                state.record_success(Utc::now());
                if let Err(err) = store.save_domain_state(&state) {
                    error!("Couldn't persist state of domain: {domain}. Error: {err}");
                }
                cache.invalidate(&domain);
                store.append_activity(&ActivityEntry::for_domain(
                    &domain,
                    EventKind::RenewalSuccess,
                    "Certificate renewed",
                ));
                events.emit(OrchestratorEvent::DomainSuccess {
                    domain: domain.clone(),
                });
                info!("Renewed certificate for domain: {domain}");
                true
            }
            Err(err) => {
                let (kind, status) = match err {
                    RenewalError::ToolBusy(_) => (EventKind::ToolBusy, DomainStatus::Error),
                    RenewalError::RenewalFailed(..) => {
                        (EventKind::RenewalFailed, DomainStatus::Failed)
                    }
                    _ => (EventKind::RenewalFailed, DomainStatus::Error),
                };
                state.record_failure(Utc::now(), status, &err.to_string());
                if let Err(save_err) = store.save_domain_state(&state) {
                    error!("Couldn't persist state of domain: {domain}. Error: {save_err}");
                }
                store.append_activity(&ActivityEntry::for_domain(
                    &domain,
                    kind,
                    &err.to_string(),
                ));
                events.emit(OrchestratorEvent::DomainFailed {
                    domain: domain.clone(),
                    error: err.to_string(),
                });
                warn!("Renewal failed for domain: {domain}. Error: {err}");
                false
            }
        }
    }
}
