use crate::products::report::CycleReport;


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
/// Orchestrator progress events. Delivery is best-effort and never blocks
/// orchestration logic:
pub enum OrchestratorEvent {
    /// A check cycle began
    CheckStarted {
        /// Number of managed domains about to be evaluated
        total_domains: usize,
    },

    /// Eligibility evaluation finished
    CheckAnalysis {
        /// Domains evaluated
        checked: usize,
        /// Domains that qualified for renewal
        eligible: usize,
    },

    /// Renewal attempt dispatched for a domain
    DomainStarted {
        /// Domain name
        domain: String,
    },

    /// Renewal succeeded for a domain
    DomainSuccess {
        /// Domain name
        domain: String,
    },

    /// Renewal failed for a domain
    DomainFailed {
        /// Domain name
        domain: String,
        /// Failure message
        error: String,
    },

    /// Waiting for the busy external tool to become free
    ToolBusyWait {
        /// Domain awaiting the tool
        domain: String,
        /// Which busy check this was
        attempt: usize,
    },

    /// A check cycle finished
    CheckCompleted {
        /// Cycle summary
        report: CycleReport,
    },

    /// A check cycle was skipped
    CheckSkipped {
        /// Why the cycle did not run
        reason: String,
    },
}


/// Implement JSON serialization on .to_string():
impl ToString for OrchestratorEvent {
    fn to_string(&self) -> String {
        serde_json::to_string(&self).unwrap_or_else(|_| {
            String::from("{\"status\": \"OrchestratorEvent serialization failure\"}")
        })
    }
}


/// Sink for orchestrator events. Implementations must never block the caller:
pub trait EventSink: Send + Sync {
    /// Emit a single event
    fn emit(&self, event: OrchestratorEvent);
}


#[derive(Debug, Copy, Clone)]
/// Sink that drops every event. Used where no presentation layer is attached:
pub struct NullSink;


impl EventSink for NullSink {
    fn emit(&self, _event: OrchestratorEvent) {}
}
