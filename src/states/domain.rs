use chrono::{DateTime, Utc};


#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Challenge mechanism used to prove domain control to the certificate tool.
/// Fixed per domain after the first successful install:
pub enum InstallMethod {
    /// HTTP-based challenge
    HttpChallenge,

    /// DNS-based challenge
    DnsChallenge,
}


#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Coarse per-domain renewal status
pub enum DomainStatus {
    /// No renewal attempted yet
    #[default]
    Unknown,

    /// Last renewal succeeded
    Active,

    /// Certificate tool ran and reported failure
    Failed,

    /// Renewal could not be attempted (tool busy, probe failure)
    Error,
}


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Durable renewal state of a single managed domain
pub struct DomainRenewalState {
    /// Unique domain name, immutable key
    pub domain: String,

    /// Whether automatic renewal applies to this domain
    pub enabled: bool,

    /// Challenge mechanism recorded at first successful install
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub install_method: Option<InstallMethod>,

    /// Coarse renewal status
    #[serde(default)]
    pub status: DomainStatus,

    /// When a renewal was last attempted
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_renewal_attempt: Option<DateTime<Utc>>,

    /// When a renewal last succeeded
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_success: Option<DateTime<Utc>>,

    /// When a renewal last failed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_failure: Option<DateTime<Utc>>,

    /// Message of the last recorded failure
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_error: Option<String>,
}


impl DomainRenewalState {
    /// New enabled domain state with no renewal history
    pub fn new(domain: &str) -> DomainRenewalState {
        DomainRenewalState {
            domain: domain.to_string(),
            enabled: true,
            install_method: None,
            status: DomainStatus::Unknown,
            last_renewal_attempt: None,
            last_success: None,
            last_failure: None,
            last_error: None,
        }
    }


    /// Record a successful renewal. A success recorded after a failure clears it:
    pub fn record_success(&mut self, now: DateTime<Utc>) {
        self.status = DomainStatus::Active;
        self.last_success = Some(now);
        self.last_failure = None;
        self.last_error = None;
        if self.install_method.is_none() {
            self.install_method = Some(InstallMethod::HttpChallenge);
        }
    }


    /// Record a failed renewal attempt with its reason:
    pub fn record_failure(&mut self, now: DateTime<Utc>, status: DomainStatus, error: &str) {
        self.status = status;
        self.last_failure = Some(now);
        self.last_error = Some(error.to_string());
    }
}
