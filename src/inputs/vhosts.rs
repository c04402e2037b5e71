use std::path::Path;

use crate::{
    config::Config,
    debug, error, info,
    states::domain::DomainRenewalState,
    store::Store,
    utilities::read_text_file,
};


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One entry of the virtual-host discovery manifest maintained by the
/// dashboard layer
pub struct VhostEntry {
    /// Configured domain name
    pub domain: String,

    /// Certificate file path already registered for the host, when any
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cert_path: Option<String>,
}


/// Read the discovery manifest. An absent manifest means no externally
/// configured hosts; an unreadable one is logged and treated the same:
pub fn discover_vhosts(manifest_path: &str) -> Vec<VhostEntry> {
    if !Path::new(manifest_path).exists() {
        debug!("No virtual-host manifest under: {manifest_path}");
        return vec![];
    }
    read_text_file(manifest_path)
        .map_err(|err| err.to_string())
        .and_then(|contents| serde_json::from_str(&contents).map_err(|err| err.to_string()))
        .unwrap_or_else(|err| {
            error!("Unreadable virtual-host manifest: {manifest_path}. Error: {err}");
            vec![]
        })
}


/// All managed domains: the union of known per-domain state files and the
/// discovery manifest. Domains appearing only in the manifest get a default
/// state created and persisted:
pub fn managed_domains(store: &Store) -> Vec<DomainRenewalState> {
    let mut states = store.domain_states();
    for entry in discover_vhosts(&Config::load().vhosts_file()) {
        if states.iter().any(|state| state.domain == entry.domain) {
            continue;
        }
        info!("Discovered new virtual host: {}", entry.domain);
        let state = DomainRenewalState::new(&entry.domain);
        if let Err(err) = store.save_domain_state(&state) {
            error!(
                "Couldn't persist state of discovered domain: {}. Error: {err}",
                entry.domain
            );
        }
        states.push(state);
    }
    states.sort_by(|a, b| a.domain.cmp(&b.domain));
    states
}
