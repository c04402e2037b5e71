#[allow(unused_imports)]
#[cfg(test)]
mod tests {

    // Load all internal modules:
    use chrono::{Duration as ChronoDuration, Utc};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    use crate::*;
    use crate::configuration::*;
    use crate::eligibility::eligibility;
    use crate::probes::cache::StatusCache;
    use crate::states::domain::*;
    use crate::states::policy::*;
    use crate::states::status::*;
    use crate::tool::certtool::RenewalDriver;
    use crate::tool::coordinator::Coordinator;
    use crate::tool::processing;
    use crate::inputs::vhosts;


    /// Renewal driver stub recording invocations and concurrency
    struct StubDriver {
        busy: bool,
        fail_domains: Vec<String>,
        invocations: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl StubDriver {
        fn ok() -> StubDriver {
            StubDriver {
                busy: false,
                fail_domains: vec![],
                invocations: Mutex::new(vec![]),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn busy() -> StubDriver {
            StubDriver {
                busy: true,
                ..StubDriver::ok()
            }
        }

        fn failing(domains: &[&str]) -> StubDriver {
            StubDriver {
                fail_domains: domains.iter().map(|domain| domain.to_string()).collect(),
                ..StubDriver::ok()
            }
        }

        fn invoked(&self) -> Vec<String> {
            self.invocations.lock().unwrap().clone()
        }
    }

    impl RenewalDriver for StubDriver {
        fn renew(&self, domain: &str, _method: InstallMethod) -> Result<(), RenewalError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            self.invocations.lock().unwrap().push(domain.to_string());
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.fail_domains.iter().any(|failing| failing == domain) {
                Err(RenewalError::RenewalFailed(
                    domain.to_string(),
                    "stub failure".to_string(),
                ))
            } else {
                Ok(())
            }
        }

        fn is_busy(&self) -> bool {
            self.busy
        }
    }


    /// Event sink stub collecting everything emitted
    #[derive(Default)]
    struct VecSink(Mutex<Vec<OrchestratorEvent>>);

    impl VecSink {
        fn events(&self) -> Vec<OrchestratorEvent> {
            self.0.lock().unwrap().clone()
        }

        fn started_domains(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|event| {
                    match event {
                        OrchestratorEvent::DomainStarted { domain } => Some(domain),
                        _ => None,
                    }
                })
                .collect()
        }
    }

    impl EventSink for VecSink {
        fn emit(&self, event: OrchestratorEvent) {
            self.0.lock().unwrap().push(event);
        }
    }


    fn fresh_status(domain: &str, days: i64) -> SslStatus {
        SslStatus::detected(domain, days, false, None, None, StatusSource::LiveProbe)
    }


    fn fast_coordinator() -> Coordinator {
        Coordinator::new(
            Duration::from_millis(5),
            Duration::from_millis(5),
            5,
            Duration::from_secs(300),
        )
    }


    fn fast_executor() -> Executor {
        Executor {
            coordinator: fast_coordinator(),
            chunk_pause: Duration::from_millis(5),
        }
    }


    fn cache_for(domains: &[(&str, i64)]) -> StatusCache {
        let statuses: Vec<(String, i64)> = domains
            .iter()
            .map(|(domain, days)| (domain.to_string(), *days))
            .collect();
        StatusCache::with_prober(Duration::from_secs(600), move |domain| {
            statuses
                .iter()
                .find(|(name, _)| name == domain)
                .map(|(name, days)| fresh_status(name, *days))
                .unwrap_or_else(|| SslStatus::not_present(domain))
        })
    }


    fn store_with_domains(dir: &TempDir, domains: &[&str]) -> Store {
        let store = Store::new(dir.path().to_path_buf());
        for domain in domains {
            store
                .save_domain_state(&DomainRenewalState::new(domain))
                .unwrap();
        }
        store
    }


    #[test]
    fn test_cache_returns_identical_results_within_ttl() {
        let probes = Arc::new(AtomicUsize::new(0));
        let counter = probes.clone();
        let cache = StatusCache::with_prober(Duration::from_secs(60), move |domain| {
            let probe = counter.fetch_add(1, Ordering::SeqCst) + 1;
            fresh_status(domain, probe as i64)
        });
        let first = cache.status("ttl.example.com");
        let second = cache.status("ttl.example.com");
        assert_eq!(first, second);
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }


    #[test]
    fn test_cache_reprobes_after_ttl_expiry() {
        let probes = Arc::new(AtomicUsize::new(0));
        let counter = probes.clone();
        let cache = StatusCache::with_prober(Duration::from_millis(0), move |domain| {
            counter.fetch_add(1, Ordering::SeqCst);
            fresh_status(domain, 10)
        });
        cache.status("expired-ttl.example.com");
        cache.status("expired-ttl.example.com");
        assert_eq!(probes.load(Ordering::SeqCst), 2);
    }


    #[test]
    fn test_cache_stores_not_present_results() {
        let probes = Arc::new(AtomicUsize::new(0));
        let counter = probes.clone();
        let cache = StatusCache::with_prober(Duration::from_secs(60), move |domain| {
            counter.fetch_add(1, Ordering::SeqCst);
            SslStatus::not_present(domain)
        });
        let first = cache.status("bare.example.com");
        let second = cache.status("bare.example.com");
        assert!(!first.has_certificate);
        assert_eq!(first, second);
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }


    #[test]
    fn test_cache_invalidate_forces_reprobe() {
        let probes = Arc::new(AtomicUsize::new(0));
        let counter = probes.clone();
        let cache = StatusCache::with_prober(Duration::from_secs(60), move |domain| {
            counter.fetch_add(1, Ordering::SeqCst);
            fresh_status(domain, 10)
        });
        cache.status("invalidate.example.com");
        cache.invalidate("invalidate.example.com");
        cache.status("invalidate.example.com");
        assert_eq!(probes.load(Ordering::SeqCst), 2);
    }


    #[test]
    fn test_eligibility_inside_window() {
        let state = DomainRenewalState::new("due.example.com");
        let policy = GlobalPolicy::default();
        let status = fresh_status("due.example.com", 10);
        assert!(eligibility(&state, &policy, &status, Utc::now()).is_ok());
    }


    #[test]
    fn test_eligibility_rejects_disabled_domain() {
        let mut state = DomainRenewalState::new("disabled.example.com");
        state.enabled = false;
        let policy = GlobalPolicy::default();
        let status = fresh_status("disabled.example.com", 1);
        assert_eq!(
            eligibility(&state, &policy, &status, Utc::now()),
            Err(SkipReason::Disabled("disabled.example.com".to_string()))
        );
    }


    #[test]
    fn test_eligibility_rejects_missing_certificate() {
        let state = DomainRenewalState::new("nocert.example.com");
        let policy = GlobalPolicy::default();
        let status = SslStatus::not_present("nocert.example.com");
        assert_eq!(
            eligibility(&state, &policy, &status, Utc::now()),
            Err(SkipReason::NoCertificate("nocert.example.com".to_string()))
        );
    }


    #[test]
    fn test_eligibility_rejects_certificate_outside_window() {
        let state = DomainRenewalState::new("fresh.example.com");
        let policy = GlobalPolicy::default();
        let status = fresh_status("fresh.example.com", 60);
        assert_eq!(
            eligibility(&state, &policy, &status, Utc::now()),
            Err(SkipReason::NotDueYet("fresh.example.com".to_string(), 60, 30))
        );
    }


    #[test]
    fn test_eligibility_rejects_domain_in_failure_cooldown() {
        let now = Utc::now();
        let mut state = DomainRenewalState::new("cooldown.example.com");
        state.last_failure = Some(now - ChronoDuration::hours(2));
        let policy = GlobalPolicy::default();
        let status = fresh_status("cooldown.example.com", 1);
        match eligibility(&state, &policy, &status, now) {
            Err(SkipReason::FailureCooldown(domain, hours)) => {
                assert_eq!(domain, "cooldown.example.com");
                assert!(hours > 0 && hours <= 22);
            }
            other => panic!("Expected failure cooldown, got: {:?}", other),
        }
    }


    #[test]
    fn test_eligibility_allows_domain_after_cooldown_elapsed() {
        let now = Utc::now();
        let mut state = DomainRenewalState::new("cooled.example.com");
        state.last_failure = Some(now - ChronoDuration::hours(30));
        let policy = GlobalPolicy::default();
        let status = fresh_status("cooled.example.com", 1);
        assert!(eligibility(&state, &policy, &status, now).is_ok());
    }


    #[test]
    fn test_eligibility_rejects_domain_mid_operation() {
        let guard = processing::mark("busy-domain.example.com");
        let state = DomainRenewalState::new("busy-domain.example.com");
        let policy = GlobalPolicy::default();
        let status = fresh_status("busy-domain.example.com", 1);
        assert_eq!(
            eligibility(&state, &policy, &status, Utc::now()),
            Err(SkipReason::AlreadyProcessing(
                "busy-domain.example.com".to_string()
            ))
        );
        drop(guard);
        assert!(eligibility(&state, &policy, &status, Utc::now()).is_ok());
    }


    #[test]
    fn test_processing_guard_clears_entry_on_drop() {
        {
            let _guard = processing::mark("guarded.example.com");
            assert!(processing::is_processing("guarded.example.com"));
        }
        assert!(!processing::is_processing("guarded.example.com"));
    }


    #[test]
    fn test_processing_stale_entry_is_evicted() {
        let _guard = processing::mark("stale.example.com");
        thread::sleep(Duration::from_millis(5));
        assert!(!processing::is_processing_with_staleness(
            "stale.example.com",
            Duration::from_millis(1)
        ));
        // evicted for good, not just reported free:
        assert!(!processing::is_processing("stale.example.com"));
    }


    #[test]
    fn test_coordinator_gives_up_on_busy_tool() {
        let driver = StubDriver::busy();
        let sink = VecSink::default();
        let result = fast_coordinator().with_exclusive_access(
            "busytool.example.com",
            &driver,
            &sink,
            || {
                driver.renew("busytool.example.com", InstallMethod::HttpChallenge)
            },
        );
        assert_eq!(result, Err(RenewalError::ToolBusy(5)));
        assert!(driver.invoked().is_empty());
        let waits = sink
            .events()
            .iter()
            .filter(|event| matches!(event, OrchestratorEvent::ToolBusyWait { .. }))
            .count();
        assert_eq!(waits, 5);
    }


    #[test]
    fn test_coordinator_runs_operation_when_tool_free() {
        let driver = StubDriver::ok();
        let sink = VecSink::default();
        let result = fast_coordinator().with_exclusive_access(
            "freetool.example.com",
            &driver,
            &sink,
            || driver.renew("freetool.example.com", InstallMethod::HttpChallenge),
        );
        assert_eq!(result, Ok(()));
        assert_eq!(driver.invoked(), vec!["freetool.example.com".to_string()]);
        assert!(!processing::is_processing("freetool.example.com"));
    }


    #[test]
    fn test_cycle_attempts_most_urgent_domains_first() {
        let dir = TempDir::new().unwrap();
        let store = store_with_domains(
            &dir,
            &["a-urgent.example.com", "b-soon.example.com", "c-fine.example.com"],
        );
        let cache = cache_for(&[
            ("a-urgent.example.com", 5),
            ("b-soon.example.com", 10),
            ("c-fine.example.com", 60),
        ]);
        let driver = StubDriver::ok();
        let sink = VecSink::default();
        let policy = GlobalPolicy {
            renewal_window_days: 30,
            max_concurrent_renewals: 2,
            ..GlobalPolicy::default()
        };

        let report = fast_executor().run_cycle(
            &store,
            &cache,
            &driver,
            &sink,
            store.domain_states(),
            &policy,
        );

        assert_eq!(report.checked, 3);
        assert_eq!(report.eligible, 2);
        assert_eq!(report.renewed, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            sink.started_domains(),
            vec![
                "a-urgent.example.com".to_string(),
                "b-soon.example.com".to_string()
            ]
        );

        let skipped_entries = store
            .activity_entries()
            .into_iter()
            .filter(|entry| entry.kind == EventKind::RenewalSkipped)
            .collect::<Vec<ActivityEntry>>();
        assert_eq!(skipped_entries.len(), 1);
        assert_eq!(skipped_entries[0].domain, "c-fine.example.com");

        let renewed = store.load_domain_state("a-urgent.example.com").unwrap();
        assert_eq!(renewed.status, DomainStatus::Active);
        assert!(renewed.last_success.is_some());
        assert!(renewed.last_failure.is_none());
    }


    #[test]
    fn test_cycle_serializes_tool_invocations() {
        let dir = TempDir::new().unwrap();
        let domains = [
            "p1.example.com",
            "p2.example.com",
            "p3.example.com",
            "p4.example.com",
            "p5.example.com",
        ];
        let store = store_with_domains(&dir, &domains);
        let cache = cache_for(&[
            ("p1.example.com", 1),
            ("p2.example.com", 2),
            ("p3.example.com", 3),
            ("p4.example.com", 4),
            ("p5.example.com", 5),
        ]);
        let driver = StubDriver::ok();
        let policy = GlobalPolicy {
            max_concurrent_renewals: 2,
            ..GlobalPolicy::default()
        };

        let report = fast_executor().run_cycle(
            &store,
            &cache,
            &driver,
            &NullSink,
            store.domain_states(),
            &policy,
        );

        assert_eq!(report.renewed, 5);
        let ceiling = driver.max_in_flight.load(Ordering::SeqCst);
        assert!(ceiling <= policy.max_concurrent_renewals);
        // the global tool guard keeps mutating invocations strictly serial:
        assert_eq!(ceiling, 1);
    }


    #[test]
    fn test_cycle_failure_never_aborts_siblings() {
        let dir = TempDir::new().unwrap();
        let store = store_with_domains(&dir, &["bad.example.com", "good.example.com"]);
        let cache = cache_for(&[("bad.example.com", 3), ("good.example.com", 7)]);
        let driver = StubDriver::failing(&["bad.example.com"]);
        let sink = VecSink::default();
        let policy = GlobalPolicy {
            max_concurrent_renewals: 2,
            ..GlobalPolicy::default()
        };

        let report = fast_executor().run_cycle(
            &store,
            &cache,
            &driver,
            &sink,
            store.domain_states(),
            &policy,
        );

        assert_eq!(report.renewed, 1);
        assert_eq!(report.failed, 1);
        let failed = store.load_domain_state("bad.example.com").unwrap();
        assert_eq!(failed.status, DomainStatus::Failed);
        assert!(failed.last_failure.is_some());
        assert!(failed.last_error.is_some());
        let renewed = store.load_domain_state("good.example.com").unwrap();
        assert_eq!(renewed.status, DomainStatus::Active);
    }


    #[test]
    fn test_cycle_busy_tool_sets_failure_and_logs_it() {
        let dir = TempDir::new().unwrap();
        let store = store_with_domains(&dir, &["stuck.example.com"]);
        let cache = cache_for(&[("stuck.example.com", 2)]);
        let driver = StubDriver::busy();

        let report = fast_executor().run_cycle(
            &store,
            &cache,
            &driver,
            &NullSink,
            store.domain_states(),
            &GlobalPolicy::default(),
        );

        assert_eq!(report.failed, 1);
        assert!(driver.invoked().is_empty());
        let state = store.load_domain_state("stuck.example.com").unwrap();
        assert_eq!(state.status, DomainStatus::Error);
        assert!(state.last_failure.is_some());
        assert!(store
            .activity_entries()
            .iter()
            .any(|entry| entry.kind == EventKind::ToolBusy));
    }


    #[test]
    fn test_cycle_success_invalidates_cached_status() {
        let dir = TempDir::new().unwrap();
        let store = store_with_domains(&dir, &["refresh.example.com"]);
        let probes = Arc::new(AtomicUsize::new(0));
        let counter = probes.clone();
        let cache = StatusCache::with_prober(Duration::from_secs(600), move |domain| {
            counter.fetch_add(1, Ordering::SeqCst);
            fresh_status(domain, 2)
        });
        let driver = StubDriver::ok();

        fast_executor().run_cycle(
            &store,
            &cache,
            &driver,
            &NullSink,
            store.domain_states(),
            &GlobalPolicy::default(),
        );
        assert_eq!(probes.load(Ordering::SeqCst), 1);

        // the post-renewal read must re-probe instead of serving stale state:
        cache.status("refresh.example.com");
        assert_eq!(probes.load(Ordering::SeqCst), 2);
    }


    #[test]
    fn test_tick_skips_when_run_lock_is_held() {
        let dir = TempDir::new().unwrap();
        let store = store_with_domains(&dir, &["locked.example.com"]);
        let lock = RunLock {
            acquired_at: Utc::now(),
            owner: "another-certmoled".to_string(),
        };
        fs::write(store.run_lock_path(), serde_json::to_string(&lock).unwrap()).unwrap();

        let cache = cache_for(&[("locked.example.com", 2)]);
        let driver = StubDriver::ok();
        let outcome = tick(&store, &cache, &driver, &fast_executor(), &NullSink);

        assert!(matches!(outcome, TickOutcome::Skipped(_)));
        assert!(driver.invoked().is_empty());
        assert!(store
            .activity_entries()
            .iter()
            .any(|entry| entry.kind == EventKind::CheckSkipped));
        // the foreign lock is left in place:
        assert!(store.run_lock_path().exists());
    }


    #[test]
    fn test_tick_reclaims_stale_run_lock() {
        let dir = TempDir::new().unwrap();
        let store = store_with_domains(&dir, &["reclaim.example.com"]);
        let lock = RunLock {
            acquired_at: Utc::now() - ChronoDuration::hours(3),
            owner: "crashed-certmoled".to_string(),
        };
        fs::write(store.run_lock_path(), serde_json::to_string(&lock).unwrap()).unwrap();

        let cache = cache_for(&[("reclaim.example.com", 2)]);
        let driver = StubDriver::ok();
        let outcome = tick(&store, &cache, &driver, &fast_executor(), &NullSink);

        match outcome {
            TickOutcome::Completed(report) => {
                assert_eq!(report.checked, 1);
                assert_eq!(report.renewed, 1);
            }
            other => panic!("Expected completed tick, got: {:?}", other),
        }
        // released after the cycle:
        assert!(!store.run_lock_path().exists());
    }


    #[test]
    fn test_tick_updates_statistics_and_summary() {
        let dir = TempDir::new().unwrap();
        let store = store_with_domains(&dir, &["stats.example.com"]);
        let cache = cache_for(&[("stats.example.com", 2)]);
        let driver = StubDriver::ok();

        let outcome = tick(&store, &cache, &driver, &fast_executor(), &NullSink);
        assert!(matches!(outcome, TickOutcome::Completed(_)));

        let policy = store.policy();
        assert_eq!(policy.statistics.checks_performed, 1);
        assert_eq!(policy.statistics.renewals_attempted, 1);
        assert_eq!(policy.statistics.renewals_succeeded, 1);
        assert_eq!(policy.statistics.renewals_failed, 0);
        assert!(policy.statistics.last_check.is_some());
        assert!(policy.statistics.last_renewal.is_some());
        assert!(store
            .activity_entries()
            .iter()
            .any(|entry| entry.kind == EventKind::CheckCompleted));
    }


    #[test]
    fn test_tick_skips_when_globally_disabled() {
        let dir = TempDir::new().unwrap();
        let store = store_with_domains(&dir, &["off.example.com"]);
        api::update_policy(&store, |policy| policy.global_enabled = false).unwrap();

        let cache = cache_for(&[("off.example.com", 2)]);
        let driver = StubDriver::ok();
        let outcome = tick(&store, &cache, &driver, &fast_executor(), &NullSink);

        assert!(matches!(outcome, TickOutcome::Skipped(_)));
        assert!(driver.invoked().is_empty());
    }


    #[test]
    fn test_tick_skips_on_corrupt_policy_store() {
        let dir = TempDir::new().unwrap();
        let store = store_with_domains(&dir, &["corrupt.example.com"]);
        fs::write(store.policy_path(), "{ not json").unwrap();

        let cache = cache_for(&[("corrupt.example.com", 2)]);
        let driver = StubDriver::ok();
        let outcome = tick(&store, &cache, &driver, &fast_executor(), &NullSink);

        assert!(matches!(outcome, TickOutcome::Skipped(_)));
        assert!(driver.invoked().is_empty());
        assert!(store
            .activity_entries()
            .iter()
            .any(|entry| entry.kind == EventKind::ConfigCorrupt));
    }


    #[test]
    fn test_policy_defaults_created_and_persisted_when_absent() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        assert!(!store.policy_path().exists());
        let policy = store.load_policy().unwrap();
        assert_eq!(policy, GlobalPolicy::default());
        assert!(store.policy_path().exists());
    }


    #[test]
    fn test_corrupt_policy_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        fs::write(store.policy_path(), "garbage").unwrap();
        let policy = store.policy();
        assert_eq!(policy.renewal_window_days, DEFAULT_RENEWAL_WINDOW_DAYS);
        assert!(store
            .activity_entries()
            .iter()
            .any(|entry| entry.kind == EventKind::ConfigCorrupt));
    }


    #[test]
    fn test_domain_state_success_clears_earlier_failure() {
        let now = Utc::now();
        let mut state = DomainRenewalState::new("invariant.example.com");
        state.record_failure(now, DomainStatus::Failed, "challenge rejected");
        assert!(state.last_failure.is_some());
        assert!(state.last_error.is_some());
        state.record_success(now + ChronoDuration::hours(1));
        assert_eq!(state.status, DomainStatus::Active);
        assert!(state.last_failure.is_none());
        assert!(state.last_error.is_none());
        assert_eq!(state.install_method, Some(InstallMethod::HttpChallenge));
    }


    #[test]
    fn test_activity_log_appends_monotonically() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        store.append_activity(&ActivityEntry::system(EventKind::CheckStarted, "first"));
        store.append_activity(&ActivityEntry::for_domain(
            "log.example.com",
            EventKind::RenewalSuccess,
            "second",
        ));
        let entries = store.activity_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[0].domain, SYSTEM_DOMAIN);
        assert_eq!(entries[1].message, "second");
        assert_eq!(entries[1].domain, "log.example.com");
    }


    #[test]
    fn test_check_frequency_intervals() {
        assert_eq!(CheckFrequency::Hourly.interval().as_secs(), 3600);
        assert_eq!(CheckFrequency::TwiceDaily.interval().as_secs(), 12 * 3600);
        assert_eq!(CheckFrequency::Daily.interval().as_secs(), 24 * 3600);
        assert_eq!(CheckFrequency::Weekly.interval().as_secs(), 7 * 24 * 3600);
    }


    #[test]
    fn test_policy_json_roundtrip() {
        let policy = GlobalPolicy {
            renewal_window_days: 14,
            check_frequency: CheckFrequency::TwiceDaily,
            max_concurrent_renewals: 4,
            ..GlobalPolicy::default()
        };
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("TWICE_DAILY"));
        let restored: GlobalPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, restored);
    }


    #[test]
    fn test_partial_policy_file_fills_defaults() {
        let restored: GlobalPolicy =
            serde_json::from_str("{\"renewal_window_days\": 7}").unwrap();
        assert_eq!(restored.renewal_window_days, 7);
        assert!(restored.global_enabled);
        assert_eq!(
            restored.max_concurrent_renewals,
            DEFAULT_MAX_CONCURRENT_RENEWALS
        );
    }


    #[test]
    fn test_settings_api_toggles_domain() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        let state = api::set_domain_enabled(&store, "toggle.example.com", false).unwrap();
        assert!(!state.enabled);
        let restored = store.load_domain_state("toggle.example.com").unwrap();
        assert!(!restored.enabled);
        let state = api::set_domain_enabled(&store, "toggle.example.com", true).unwrap();
        assert!(state.enabled);
    }


    #[test]
    fn test_settings_api_updates_policy_fields() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        let updated = api::update_policy(&store, |policy| {
            policy.renewal_window_days = 21;
            policy.check_frequency = CheckFrequency::Hourly;
        })
        .unwrap();
        assert_eq!(updated.renewal_window_days, 21);
        let restored = store.load_policy().unwrap();
        assert_eq!(restored.renewal_window_days, 21);
        assert_eq!(restored.check_frequency, CheckFrequency::Hourly);
    }


    #[test]
    fn test_vhost_manifest_discovery() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("vhosts.json");
        fs::write(
            &manifest,
            "[{\"domain\": \"shop.example.com\", \"cert_path\": \"/etc/certs/shop.pem\"}, {\"domain\": \"blog.example.com\"}]",
        )
        .unwrap();
        let entries = vhosts::discover_vhosts(&manifest.to_string_lossy());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].domain, "shop.example.com");
        assert_eq!(
            entries[0].cert_path,
            Some("/etc/certs/shop.pem".to_string())
        );
        assert_eq!(entries[1].cert_path, None);
    }


    #[test]
    fn test_vhost_manifest_absent_yields_no_entries() {
        assert!(vhosts::discover_vhosts("/nonexistent/vhosts.json").is_empty());
    }


    #[test]
    fn test_ssl_status_expiring_soon_threshold() {
        let soon = fresh_status("soon.example.com", 10);
        assert!(soon.is_expiring_soon);
        assert!(!soon.is_expired);
        let fine = fresh_status("fine.example.com", 90);
        assert!(!fine.is_expiring_soon);
        let expired = SslStatus::detected(
            "dead.example.com",
            0,
            true,
            None,
            None,
            StatusSource::LiveProbe,
        );
        assert!(expired.is_expired);
    }


    #[test]
    fn test_domain_state_json_roundtrip() {
        let mut state = DomainRenewalState::new("roundtrip.example.com");
        state.install_method = Some(InstallMethod::DnsChallenge);
        state.record_success(Utc::now());
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("DNS_CHALLENGE"));
        assert!(json.contains("ACTIVE"));
        let restored: DomainRenewalState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, restored);
    }
}
