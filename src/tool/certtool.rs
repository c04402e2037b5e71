use std::{path::PathBuf, process::Command};

use crate::{
    config::Config,
    debug, info,
    products::failure::RenewalError,
    states::domain::InstallMethod,
};


/// Seam to the external certificate tool. The tool is a point-in-time,
/// pass/fail operation per domain per installation method, and its busy state
/// is detectable through its lock artifact:
pub trait RenewalDriver: Send + Sync {
    /// Run the tool for a domain with the given installation method
    fn renew(&self, domain: &str, method: InstallMethod) -> Result<(), RenewalError>;

    /// Whether the tool is currently active system-wide
    fn is_busy(&self) -> bool;
}


#[derive(Debug, Clone)]
/// Driver invoking the configured external certificate tool binary
pub struct CertTool {
    /// Tool binary location
    pub binary: PathBuf,

    /// Lock artifact left behind while the tool runs
    pub lock_file: PathBuf,
}


impl CertTool {
    /// Driver built from the dynamic configuration
    pub fn from_config() -> CertTool {
        let config = Config::load();
        CertTool {
            binary: PathBuf::from(config.tool_bin()),
            lock_file: PathBuf::from(config.tool_lock_file()),
        }
    }


    fn method_argument(method: InstallMethod) -> &'static str {
        match method {
            InstallMethod::HttpChallenge => "--http",
            InstallMethod::DnsChallenge => "--dns",
        }
    }
}


impl RenewalDriver for CertTool {
    fn renew(&self, domain: &str, method: InstallMethod) -> Result<(), RenewalError> {
        info!(
            "Invoking certificate tool: {} for domain: {domain} with method argument: {}",
            self.binary.display(),
            Self::method_argument(method)
        );
        let output = Command::new(&self.binary)
            .arg("--domain")
            .arg(domain)
            .arg(Self::method_argument(method))
            .output()
            .map_err(|err| {
                RenewalError::RenewalFailed(domain.to_string(), format!("Tool spawn failed: {err}"))
            })?;
        if output.status.success() {
            debug!("Certificate tool succeeded for domain: {domain}");
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let details = if stderr.is_empty() {
                format!("Tool exited with status: {}", output.status)
            } else {
                stderr
            };
            Err(RenewalError::RenewalFailed(domain.to_string(), details))
        }
    }


    fn is_busy(&self) -> bool {
        self.lock_file.exists()
    }
}
