//
// Default configuration and default values:
//


/// Default state directory keeping policy, domain states and activity log:
pub const DEFAULT_STATE_DIR: &str = "/var/lib/certmole";

/// Default directory with per-domain certificate files:
pub const DEFAULT_CERTS_DIR: &str = "/etc/certmole/certs";

/// Conventional certificate file name under the per-domain directory:
pub const CERT_FILE_NAME: &str = "fullchain.pem";

/// Default external certificate tool binary:
pub const DEFAULT_TOOL_BIN: &str = "/usr/local/bin/cert-issuer";

/// Default lock artifact left behind by a running certificate tool:
pub const DEFAULT_TOOL_LOCK_FILE: &str = "/var/run/cert-issuer.lock";


/// TLS probe timeout in seconds (per channel):
pub const PROBE_TIMEOUT: u64 = 5;

/// Status cache entry time-to-live in seconds:
pub const STATUS_CACHE_TTL: u64 = 300;

/// Certificates valid for fewer days than this are reported as expiring soon:
pub const EXPIRING_SOON_DAYS: i64 = 30;


/// Processing-set entry older than this many seconds is stale and evicted:
pub const PROCESSING_STALENESS: u64 = 300;

/// Poll interval while waiting for a processing-set entry to clear (milliseconds):
pub const PROCESSING_POLL_INTERVAL_MS: u64 = 2000;

/// How many times the busy external tool is checked before giving up:
pub const TOOL_BUSY_CHECKS: usize = 5;

/// Fixed delay between busy-tool checks (milliseconds):
pub const TOOL_BUSY_RETRY_DELAY_MS: u64 = 5000;

/// Pause between renewal chunks within one cycle (milliseconds):
pub const CHUNK_PAUSE_MS: u64 = 3000;


/// Run lock older than this many seconds is abandoned and force-released:
pub const RUN_LOCK_STALENESS: u64 = 7200;

/// Scheduler wait-loop slice in seconds (cadence changes apply on the next slice):
pub const SCHEDULER_POLL: u64 = 30;


/// Default renewal window in days:
pub const DEFAULT_RENEWAL_WINDOW_DAYS: i64 = 30;

/// Default renewal concurrency ceiling:
pub const DEFAULT_MAX_CONCURRENT_RENEWALS: usize = 2;

/// Default cooldown in hours before a failed domain is retried:
pub const DEFAULT_RETRY_FAILED_AFTER_HOURS: i64 = 24;


/// Sentinel domain name used for system-wide activity entries:
pub const SYSTEM_DOMAIN: &str = "system";
