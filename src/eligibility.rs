use chrono::{DateTime, Duration, Utc};

use crate::{
    products::failure::SkipReason,
    states::{domain::DomainRenewalState, policy::GlobalPolicy, status::SslStatus},
    tool::processing,
};


/// Decide whether a domain qualifies for a renewal attempt right now. A domain
/// is eligible iff renewal is enabled for it, no operation on it is in flight,
/// a certificate is present, the certificate is inside the renewal window, and
/// no failure cooldown is in effect. Every rejection carries a reason for the
/// activity log:
pub fn eligibility(
    state: &DomainRenewalState,
    policy: &GlobalPolicy,
    status: &SslStatus,
    now: DateTime<Utc>,
) -> Result<(), SkipReason> {
    if !state.enabled {
        return Err(SkipReason::Disabled(state.domain.clone()));
    }
    if processing::is_processing(&state.domain) {
        return Err(SkipReason::AlreadyProcessing(state.domain.clone()));
    }
    if !status.has_certificate {
        return Err(SkipReason::NoCertificate(state.domain.clone()));
    }
    let days_left = status.days_left();
    if days_left > policy.renewal_window_days {
        return Err(SkipReason::NotDueYet(
            state.domain.clone(),
            days_left,
            policy.renewal_window_days,
        ));
    }
    if let Some(last_failure) = state.last_failure {
        let cooldown = Duration::hours(policy.retry_failed_after_hours);
        let since_failure = now - last_failure;
        if since_failure < cooldown {
            let hours_left = (cooldown - since_failure).num_hours().max(1);
            return Err(SkipReason::FailureCooldown(state.domain.clone(), hours_left));
        }
    }
    Ok(())
}
