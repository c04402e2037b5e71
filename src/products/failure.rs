use thiserror::Error;


#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Eq)]
/// Renewal failure taxonomy. Every variant is local to one domain attempt and
/// never aborts the batch or the cycle:
pub enum RenewalError {
    /// External tool kept reporting busy after the bounded retry count
    #[error("Certificate tool still busy after {0} checks. Attempt abandoned for this cycle")]
    ToolBusy(usize),

    /// No probe channel could determine certificate status
    #[error("No probe channel could determine certificate status for domain: {0}")]
    ProbeUnavailable(String),

    /// Tool ran but reported failure
    #[error("Certificate tool failed for domain: {0}. Details: {1}")]
    RenewalFailed(String, String),

    /// Persisted policy or state unreadable
    #[error("Persisted configuration is unreadable. Details: {0}")]
    ConfigCorrupt(String),
}


#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Eq)]
/// Reason a domain was skipped by the eligibility evaluation. Never silent -
/// each one lands in the activity log:
pub enum SkipReason {
    /// Automatic renewal disabled for the domain
    #[error("Domain: {0} has automatic renewal disabled")]
    Disabled(String),

    /// Another operation on the domain is still in flight
    #[error("Domain: {0} is already being processed")]
    AlreadyProcessing(String),

    /// Nothing to renew
    #[error("Domain: {0} has no detectable certificate to renew")]
    NoCertificate(String),

    /// Certificate still valid for longer than the renewal window
    #[error("Domain: {0} is valid for {1} more days, renewal window is {2} days")]
    NotDueYet(String, i64, i64),

    /// Failure cooldown still in effect
    #[error("Domain: {0} failed recently, retry allowed in {1} more hours")]
    FailureCooldown(String, i64),
}
