use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::Config,
    debug, error,
    products::{
        activity::{ActivityEntry, EventKind},
        failure::RenewalError,
    },
    states::{domain::DomainRenewalState, policy::GlobalPolicy},
    utilities::{produce_list_absolute, read_text_file, write_append},
    warn,
};


#[derive(Debug, Clone)]
/// Durable record of global policy, per-domain renewal states and the
/// append-only activity log. Everything is kept as JSON files under the state
/// directory. All mutation flows through the single-threaded scheduler cycle,
/// so last-writer-wins is acceptable for the policy singleton:
pub struct Store {
    state_dir: PathBuf,
}


impl Store {
    /// Store rooted at the given state directory, which is created on demand
    pub fn new(state_dir: impl Into<PathBuf>) -> Store {
        let store = Store {
            state_dir: state_dir.into(),
        };
        if let Err(err) = fs::create_dir_all(store.domains_dir()) {
            error!(
                "Couldn't create state directory: {}. Error: {err}",
                store.state_dir.display()
            );
        }
        store
    }


    /// Store rooted at the configured state directory
    pub fn from_config() -> Store {
        Store::new(Config::load().state_dir())
    }


    /// Policy singleton location
    pub fn policy_path(&self) -> PathBuf {
        self.state_dir.join("policy.json")
    }


    /// Per-domain state files directory
    pub fn domains_dir(&self) -> PathBuf {
        self.state_dir.join("domains")
    }


    /// Activity log location
    pub fn activity_path(&self) -> PathBuf {
        self.state_dir.join("activity.log")
    }


    /// Run lock record location
    pub fn run_lock_path(&self) -> PathBuf {
        self.state_dir.join("runlock.json")
    }


    /// Load the policy singleton. An absent file yields defaults which are
    /// persisted immediately; an unreadable file is a corrupt-config failure:
    pub fn load_policy(&self) -> Result<GlobalPolicy, RenewalError> {
        let path = self.policy_path();
        if !path.exists() {
            let policy = GlobalPolicy::default();
            debug!("No policy found under: {}. Creating defaults", path.display());
            if let Err(err) = self.save_policy(&policy) {
                warn!("Couldn't persist default policy: {err}");
            }
            return Ok(policy);
        }
        let contents = read_text_file(&path.to_string_lossy())
            .map_err(|err| RenewalError::ConfigCorrupt(err.to_string()))?;
        serde_json::from_str(&contents)
            .map_err(|err| RenewalError::ConfigCorrupt(err.to_string()))
    }


    /// Policy with a lenient fallback: a corrupt store logs a system activity
    /// entry and yields defaults instead of failing the caller:
    pub fn policy(&self) -> GlobalPolicy {
        self.load_policy().unwrap_or_else(|err| {
            error!("{err}");
            self.append_activity(&ActivityEntry::system(
                EventKind::ConfigCorrupt,
                &err.to_string(),
            ));
            GlobalPolicy::default()
        })
    }


    /// Persist the policy singleton
    pub fn save_policy(&self, policy: &GlobalPolicy) -> Result<(), std::io::Error> {
        let contents = serde_json::to_string_pretty(policy)?;
        fs::write(self.policy_path(), contents)
    }


    /// Load the renewal state of one domain. Corrupt state files are logged
    /// and treated as absent:
    pub fn load_domain_state(&self, domain: &str) -> Option<DomainRenewalState> {
        let path = self.domain_state_path(domain);
        let contents = read_text_file(&path.to_string_lossy()).ok()?;
        match serde_json::from_str(&contents) {
            Ok(state) => Some(state),
            Err(err) => {
                error!("Corrupt state file for domain: {domain}. Error: {err}");
                None
            }
        }
    }


    /// Persist the renewal state of one domain
    pub fn save_domain_state(&self, state: &DomainRenewalState) -> Result<(), std::io::Error> {
        let contents = serde_json::to_string_pretty(state)?;
        fs::write(self.domain_state_path(&state.domain), contents)
    }


    /// All known per-domain renewal states
    pub fn domain_states(&self) -> Vec<DomainRenewalState> {
        let pattern = format!("{}/*.json", self.domains_dir().to_string_lossy());
        produce_list_absolute(&pattern)
            .iter()
            .filter_map(|file| {
                read_text_file(file)
                    .ok()
                    .and_then(|contents| match serde_json::from_str(&contents) {
                        Ok(state) => Some(state),
                        Err(err) => {
                            error!("Corrupt state file: {file}. Error: {err}");
                            None
                        }
                    })
            })
            .collect()
    }


    /// Append an entry to the activity log. Entries are JSON lines, appended
    /// monotonically and never rewritten:
    pub fn append_activity(&self, entry: &ActivityEntry) {
        let path = self.activity_path();
        if let Err(err) = write_append(&path.to_string_lossy(), &entry.to_string()) {
            error!("Couldn't append activity entry: {err}");
        }
    }


    /// Parse the whole activity log, oldest first. Unparsable lines are skipped:
    pub fn activity_entries(&self) -> Vec<ActivityEntry> {
        let path = self.activity_path();
        if !Path::new(&path).exists() {
            return vec![];
        }
        read_text_file(&path.to_string_lossy())
            .map(|contents| {
                contents
                    .lines()
                    .filter_map(|line| serde_json::from_str(line).ok())
                    .collect()
            })
            .unwrap_or_default()
    }


    fn domain_state_path(&self, domain: &str) -> PathBuf {
        self.domains_dir().join(format!("{domain}.json"))
    }
}
