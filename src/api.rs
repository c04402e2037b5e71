use crate::{
    debug,
    states::{domain::DomainRenewalState, policy::GlobalPolicy},
    store::Store,
};


/**
    Settings interface for the presentation layer: read and update global
    policy fields and per-domain enabled toggles. Updates are plain
    read-modify-writes and take effect on the next scheduler tick.
 **/


/// Current global policy, with defaults when the store is absent or corrupt
pub fn current_policy(store: &Store) -> GlobalPolicy {
    store.policy()
}


/// Update the global policy through a mutator and persist the result
pub fn update_policy(
    store: &Store,
    mutate: impl FnOnce(&mut GlobalPolicy),
) -> Result<GlobalPolicy, std::io::Error> {
    let mut policy = store.policy();
    mutate(&mut policy);
    store.save_policy(&policy)?;
    debug!("Policy updated");
    Ok(policy)
}


/// Flip the global master switch
pub fn set_global_enabled(store: &Store, enabled: bool) -> Result<GlobalPolicy, std::io::Error> {
    update_policy(store, |policy| policy.global_enabled = enabled)
}


/// Toggle automatic renewal for one domain. Unknown domains get a fresh state
/// created so the toggle survives until the host is discovered:
pub fn set_domain_enabled(
    store: &Store,
    domain: &str,
    enabled: bool,
) -> Result<DomainRenewalState, std::io::Error> {
    let mut state = store
        .load_domain_state(domain)
        .unwrap_or_else(|| DomainRenewalState::new(domain));
    state.enabled = enabled;
    store.save_domain_state(&state)?;
    debug!("Domain: {domain} automatic renewal set to: {enabled}");
    Ok(state)
}
