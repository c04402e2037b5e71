use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::configuration::{
    DEFAULT_MAX_CONCURRENT_RENEWALS, DEFAULT_RENEWAL_WINDOW_DAYS, DEFAULT_RETRY_FAILED_AFTER_HOURS,
};


#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// How often the scheduler fires a renewal check cycle
pub enum CheckFrequency {
    /// Every hour
    Hourly,

    /// Every 12 hours
    TwiceDaily,

    /// Every 24 hours
    #[default]
    Daily,

    /// Every 7 days
    Weekly,
}


impl CheckFrequency {
    /// Cadence expressed as a Duration
    pub fn interval(&self) -> Duration {
        match self {
            CheckFrequency::Hourly => Duration::from_secs(60 * 60),
            CheckFrequency::TwiceDaily => Duration::from_secs(12 * 60 * 60),
            CheckFrequency::Daily => Duration::from_secs(24 * 60 * 60),
            CheckFrequency::Weekly => Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Monotonically increasing renewal counters, persisted with the policy
pub struct RenewalStatistics {
    /// Completed check cycles
    #[serde(default)]
    pub checks_performed: u64,

    /// Renewals attempted across all cycles
    #[serde(default)]
    pub renewals_attempted: u64,

    /// Renewals that succeeded
    #[serde(default)]
    pub renewals_succeeded: u64,

    /// Renewals that failed
    #[serde(default)]
    pub renewals_failed: u64,

    /// When the last check cycle completed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_check: Option<DateTime<Utc>>,

    /// When the last successful renewal happened
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_renewal: Option<DateTime<Utc>>,
}


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Global renewal policy singleton, mutated only through explicit settings updates
pub struct GlobalPolicy {
    /// Master switch for the whole orchestrator
    #[serde(default = "default_global_enabled")]
    pub global_enabled: bool,

    /// Renew when days-until-expiry is less or equal to this value
    #[serde(default = "default_renewal_window_days")]
    pub renewal_window_days: i64,

    /// Scheduler cadence
    #[serde(default)]
    pub check_frequency: CheckFrequency,

    /// Renewal concurrency ceiling within one cycle (at least 1)
    #[serde(default = "default_max_concurrent_renewals")]
    pub max_concurrent_renewals: usize,

    /// Cooldown in hours before a recently failed domain is retried
    #[serde(default = "default_retry_failed_after_hours")]
    pub retry_failed_after_hours: i64,

    /// Monotonic counters and last-check/last-renewal timestamps
    #[serde(default)]
    pub statistics: RenewalStatistics,
}


fn default_global_enabled() -> bool {
    true
}

fn default_renewal_window_days() -> i64 {
    DEFAULT_RENEWAL_WINDOW_DAYS
}

fn default_max_concurrent_renewals() -> usize {
    DEFAULT_MAX_CONCURRENT_RENEWALS
}

fn default_retry_failed_after_hours() -> i64 {
    DEFAULT_RETRY_FAILED_AFTER_HOURS
}


impl Default for GlobalPolicy {
    fn default() -> GlobalPolicy {
        GlobalPolicy {
            global_enabled: default_global_enabled(),
            renewal_window_days: default_renewal_window_days(),
            check_frequency: CheckFrequency::default(),
            max_concurrent_renewals: default_max_concurrent_renewals(),
            retry_failed_after_hours: default_retry_failed_after_hours(),
            statistics: RenewalStatistics::default(),
        }
    }
}


impl GlobalPolicy {
    /// Concurrency ceiling, never below 1
    pub fn chunk_size(&self) -> usize {
        self.max_concurrent_renewals.max(1)
    }
}
