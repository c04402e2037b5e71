use chrono::{DateTime, Utc};

use crate::configuration::SYSTEM_DOMAIN;


#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Kind of an activity log entry
pub enum EventKind {
    /// Check cycle started
    CheckStarted,

    /// Check cycle finished with a summary
    CheckCompleted,

    /// Check cycle skipped (run lock held, master switch off)
    CheckSkipped,

    /// Renewal attempt started for a domain
    RenewalStarted,

    /// Renewal succeeded for a domain
    RenewalSuccess,

    /// Renewal failed for a domain
    RenewalFailed,

    /// Domain skipped by eligibility evaluation
    RenewalSkipped,

    /// External tool unavailable after bounded retries
    ToolBusy,

    /// Persisted policy or state fell back to defaults
    ConfigCorrupt,
}


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Append-only activity log entry. Never mutated after creation:
pub struct ActivityEntry {
    /// Entry creation instant
    pub timestamp: DateTime<Utc>,

    /// Domain the entry concerns, or the system sentinel
    pub domain: String,

    /// Entry kind
    pub kind: EventKind,

    /// Human-readable message
    pub message: String,

    /// Optional structured details
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<serde_json::Value>,
}


impl ActivityEntry {
    /// New entry for a single domain
    pub fn for_domain(domain: &str, kind: EventKind, message: &str) -> ActivityEntry {
        ActivityEntry {
            timestamp: Utc::now(),
            domain: domain.to_string(),
            kind,
            message: message.to_string(),
            details: None,
        }
    }


    /// New system-wide entry
    pub fn system(kind: EventKind, message: &str) -> ActivityEntry {
        Self::for_domain(SYSTEM_DOMAIN, kind, message)
    }


    /// Attach structured details
    pub fn with_details(mut self, details: serde_json::Value) -> ActivityEntry {
        self.details = Some(details);
        self
    }
}


/// Implement JSON serialization on .to_string():
impl ToString for ActivityEntry {
    fn to_string(&self) -> String {
        serde_json::to_string(&self).unwrap_or_else(|_| {
            String::from("{\"status\": \"ActivityEntry serialization failure\"}")
        })
    }
}
