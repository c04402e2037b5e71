use lazy_static::lazy_static;
use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::{configuration::PROCESSING_STALENESS, warn};


lazy_static! {
    /// Domains currently mid-operation, with their insertion instant. Membership
    /// is the per-domain mutex:
    static ref PROCESSING: Mutex<HashMap<String, Instant>> = Mutex::new(HashMap::new());
}


fn lock_processing() -> std::sync::MutexGuard<'static, HashMap<String, Instant>> {
    PROCESSING
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}


/// Whether a domain has a live processing entry. An entry older than the
/// staleness window is evicted on sight so a stuck entry cannot permanently
/// block a domain:
pub fn is_processing_with_staleness(domain: &str, staleness: Duration) -> bool {
    let mut processing = lock_processing();
    match processing.get(domain) {
        Some(inserted_at) if inserted_at.elapsed() >= staleness => {
            warn!("Evicting stale processing entry for domain: {domain}");
            processing.remove(domain);
            false
        }
        Some(_) => true,
        None => false,
    }
}


/// Processing check with the default staleness window:
pub fn is_processing(domain: &str) -> bool {
    is_processing_with_staleness(domain, Duration::from_secs(PROCESSING_STALENESS))
}


/// Insert a domain into the processing set. The returned guard removes the
/// entry again on every exit path:
pub fn mark(domain: &str) -> ProcessingGuard {
    lock_processing().insert(domain.to_string(), Instant::now());
    ProcessingGuard(domain.to_string())
}


/// Remove a domain from the processing set:
pub fn clear(domain: &str) {
    lock_processing().remove(domain);
}


#[derive(Debug)]
/// Clears the processing entry of a domain when dropped:
pub struct ProcessingGuard(String);


impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        clear(&self.0);
    }
}
