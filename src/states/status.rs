use chrono::{DateTime, Utc};

use crate::configuration::EXPIRING_SOON_DAYS;


#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Probe channel that produced an SslStatus
pub enum StatusSource {
    /// Locally stored certificate file
    LocalCertificate,

    /// Live TLS handshake against the domain itself
    LiveProbe,

    /// Live TLS handshake against the www-prefixed variant
    WwwFallback,

    /// No channel could detect a certificate
    NotDetected,
}


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Point-in-time TLS certificate status of a domain. Cached, never persisted:
pub struct SslStatus {
    /// Domain the status was probed for
    pub domain: String,

    /// Whether any certificate was detected at all
    pub has_certificate: bool,

    /// Certificate not-after instant
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expiry: Option<DateTime<Utc>>,

    /// Days left until expiry (negative when already expired)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub days_until_expiry: Option<i64>,

    /// Whether the certificate is already expired
    pub is_expired: bool,

    /// Whether the certificate expires within the expiring-soon threshold
    pub is_expiring_soon: bool,

    /// Certificate issuer, when the probe channel exposes it
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub issuer: Option<String>,

    /// Probe channel used
    pub source: StatusSource,
}


impl SslStatus {
    /// Status for a detected certificate valid for the given number of days
    pub fn detected(
        domain: &str,
        days: i64,
        expired: bool,
        expiry: Option<DateTime<Utc>>,
        issuer: Option<String>,
        source: StatusSource,
    ) -> SslStatus {
        SslStatus {
            domain: domain.to_string(),
            has_certificate: true,
            expiry,
            days_until_expiry: Some(days),
            is_expired: expired || days < 0,
            is_expiring_soon: expired || days <= EXPIRING_SOON_DAYS,
            issuer,
            source,
        }
    }


    /// Status meaning "no certificate currently detectable"
    pub fn not_present(domain: &str) -> SslStatus {
        SslStatus {
            domain: domain.to_string(),
            has_certificate: false,
            expiry: None,
            days_until_expiry: None,
            is_expired: false,
            is_expiring_soon: false,
            issuer: None,
            source: StatusSource::NotDetected,
        }
    }


    /// Days left until expiry, pessimistic default when unknown
    pub fn days_left(&self) -> i64 {
        self.days_until_expiry.unwrap_or(i64::MAX)
    }
}
