use lazy_static::lazy_static;
use retry::{delay::Fixed, retry};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    thread,
    time::{Duration, Instant},
};

use crate::{
    configuration::{
        PROCESSING_POLL_INTERVAL_MS, PROCESSING_STALENESS, TOOL_BUSY_CHECKS,
        TOOL_BUSY_RETRY_DELAY_MS,
    },
    events::{EventSink, OrchestratorEvent},
    info,
    products::failure::RenewalError,
    tool::{certtool::RenewalDriver, processing},
    warn,
};


lazy_static! {
    /// At most one mutating operation against the external tool may be in
    /// flight globally at any instant:
    static ref TOOL_GUARD: Mutex<()> = Mutex::new(());
}


#[derive(Debug, Copy, Clone)]
/// Serializes invocations of the external certificate tool. Multiple domains
/// may queue awaiting their turn; every wait has an explicit bound:
pub struct Coordinator {
    /// Poll interval while a domain's processing entry is held elsewhere
    pub poll_interval: Duration,

    /// Fixed delay between busy-tool checks
    pub busy_delay: Duration,

    /// Bounded number of busy-tool checks before the attempt is abandoned
    pub busy_checks: usize,

    /// Staleness window for processing entries
    pub staleness: Duration,
}


impl Default for Coordinator {
    fn default() -> Coordinator {
        Coordinator {
            poll_interval: Duration::from_millis(PROCESSING_POLL_INTERVAL_MS),
            busy_delay: Duration::from_millis(TOOL_BUSY_RETRY_DELAY_MS),
            busy_checks: TOOL_BUSY_CHECKS,
            staleness: Duration::from_secs(PROCESSING_STALENESS),
        }
    }
}


impl Coordinator {
    /// Coordinator with explicit timing parameters
    pub fn new(
        poll_interval: Duration,
        busy_delay: Duration,
        busy_checks: usize,
        staleness: Duration,
    ) -> Coordinator {
        Coordinator {
            poll_interval,
            busy_delay,
            busy_checks,
            staleness,
        }
    }


    /// Run an operation with exclusive access to the external tool for one
    /// domain. Waits for the domain's processing entry to clear, waits for the
    /// tool to become free within the bounded retry count, then runs the
    /// operation with the domain marked as processing and the global tool
    /// guard held. The processing entry is removed on all exit paths:
    pub fn with_exclusive_access<T>(
        &self,
        domain: &str,
        driver: &dyn RenewalDriver,
        events: &dyn EventSink,
        operation: impl FnOnce() -> Result<T, RenewalError>,
    ) -> Result<T, RenewalError> {
        self.wait_for_domain(domain);
        self.wait_for_tool(domain, driver, events)?;
        let _processing = processing::mark(domain);
        let _tool = TOOL_GUARD
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        operation()
    }


    /// Poll until the domain's processing entry clears. Hitting the staleness
    /// window force-continues instead of blocking forever:
    fn wait_for_domain(&self, domain: &str) {
        let deadline = Instant::now() + self.staleness;
        while processing::is_processing_with_staleness(domain, self.staleness) {
            if Instant::now() >= deadline {
                warn!("Waited out the staleness window for domain: {domain}. Continuing");
                processing::clear(domain);
                break;
            }
            info!("Domain: {domain} is mid-operation elsewhere. Waiting");
            thread::sleep(self.poll_interval);
        }
    }


    /// Check the system-wide tool busy state with bounded fixed-delay retries.
    /// Each wait emits a progress event. Exhausting the retry count abandons
    /// the attempt for this cycle with a ToolBusy failure:
    fn wait_for_tool(
        &self,
        domain: &str,
        driver: &dyn RenewalDriver,
        events: &dyn EventSink,
    ) -> Result<(), RenewalError> {
        let attempts = AtomicUsize::new(0);
        let delay = Fixed::from_millis(self.busy_delay.as_millis() as u64)
            .take(self.busy_checks.saturating_sub(1));
        retry(delay, || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if driver.is_busy() {
                info!(
                    "Certificate tool busy. Check {attempt} of {} for domain: {domain}",
                    self.busy_checks
                );
                events.emit(OrchestratorEvent::ToolBusyWait {
                    domain: domain.to_string(),
                    attempt,
                });
                Err(())
            } else {
                Ok(())
            }
        })
        .map_err(|_| RenewalError::ToolBusy(self.busy_checks))
    }
}
