use lazy_static::lazy_static;
use std::{
    collections::HashMap,
    fmt,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::{
    configuration::STATUS_CACHE_TTL, debug, probes::prober::probe_domain, states::status::SslStatus,
};


lazy_static! {
    /// Process-wide status cache backed by the default prober:
    pub static ref STATUS_CACHE: StatusCache =
        StatusCache::new(Duration::from_secs(STATUS_CACHE_TTL));
}


/// Cached probe result with its fetch instant:
struct CacheEntry {
    status: SslStatus,
    fetched_at: Instant,
}


/// Time-boxed memoization layer over the status prober. Within the TTL window
/// repeated reads for a domain return the stored result unchanged, even when
/// underlying probes would disagree. Not-present results are cached as well so
/// a domain without a certificate is not hammered with probes:
pub struct StatusCache {
    ttl: Duration,
    prober: Box<dyn Fn(&str) -> SslStatus + Send + Sync>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}


impl StatusCache {
    /// New cache backed by the default three-channel prober
    pub fn new(ttl: Duration) -> StatusCache {
        StatusCache::with_prober(ttl, probe_domain)
    }


    /// New cache backed by an arbitrary prober function
    pub fn with_prober(
        ttl: Duration,
        prober: impl Fn(&str) -> SslStatus + Send + Sync + 'static,
    ) -> StatusCache {
        StatusCache {
            ttl,
            prober: Box::new(prober),
            entries: Mutex::new(HashMap::new()),
        }
    }


    /// Certificate status of a domain, served from cache within the TTL window
    /// and re-probed otherwise:
    pub fn status(&self, domain: &str) -> SslStatus {
        {
            let entries = self.lock_entries();
            if let Some(entry) = entries.get(domain) {
                if entry.fetched_at.elapsed() < self.ttl {
                    debug!("Status cache hit for domain: {domain}");
                    return entry.status.clone();
                }
            }
        }
        let status = (self.prober)(domain);
        let mut entries = self.lock_entries();
        entries.insert(
            domain.to_string(),
            CacheEntry {
                status: status.clone(),
                fetched_at: Instant::now(),
            },
        );
        status
    }


    /// Drop the cached entry of a domain. Mandatory after every mutating
    /// operation so the next read reflects new state:
    pub fn invalidate(&self, domain: &str) {
        debug!("Invalidating status cache entry for domain: {domain}");
        self.lock_entries().remove(domain);
    }


    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}


impl fmt::Debug for StatusCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.lock_entries().len())
            .finish()
    }
}
