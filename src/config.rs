use crate::*;
use std::{
    io::{Error, ErrorKind},
    path::Path,
};


#[derive(Debug, Clone, Serialize, Deserialize, Default)]
/// Dynamic configuration read on demand by Certmole
pub struct Config {
    /// Directory keeping policy, per-domain states and the activity log
    pub state_dir: Option<String>,

    /// Directory with per-domain certificate files
    pub certs_dir: Option<String>,

    /// Virtual-host discovery manifest maintained by the dashboard layer
    pub vhosts_file: Option<String>,

    /// External certificate tool binary
    pub tool_bin: Option<String>,

    /// Lock artifact left behind by a running certificate tool
    pub tool_lock_file: Option<String>,

    /// Log level for Certmole-server
    pub log_level: Option<String>,

    /// Webhook for best-effort orchestrator event notifications
    pub events_webhook: Option<String>,

    /// Channel for webhook notifications
    pub events_channel: Option<String>,
}


impl Config {
    /// Load Certmole configuration file
    pub fn load() -> Config {
        let config_paths = [
            "/etc/certmole/certmole.conf",
            "/Services/Certmole/service.conf",
            "/Projects/certmole/certmole.conf",
            "certmole.conf",
        ];
        let config: String = config_paths
            .iter()
            .filter(|file| Path::new(file).exists())
            .take(1)
            .cloned()
            .collect();
        read_text_file(&config)
            .and_then(|file_contents| {
                serde_json::from_str(&file_contents).map_err(|err| {
                    let config_error = Error::new(ErrorKind::InvalidInput, err.to_string());
                    error!("Configuration error: {} in file: {}", err, config);
                    config_error
                })
            })
            .unwrap_or_default()
    }

    /// State directory with a default fallback
    pub fn state_dir(&self) -> String {
        self.state_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_STATE_DIR.to_string())
    }

    /// Certificates directory with a default fallback
    pub fn certs_dir(&self) -> String {
        self.certs_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_CERTS_DIR.to_string())
    }

    /// Virtual-host manifest path with a default fallback
    pub fn vhosts_file(&self) -> String {
        self.vhosts_file
            .clone()
            .unwrap_or_else(|| format!("{}/vhosts.json", self.state_dir()))
    }

    /// External tool binary with a default fallback
    pub fn tool_bin(&self) -> String {
        self.tool_bin
            .clone()
            .unwrap_or_else(|| DEFAULT_TOOL_BIN.to_string())
    }

    /// External tool lock artifact with a default fallback
    pub fn tool_lock_file(&self) -> String {
        self.tool_lock_file
            .clone()
            .unwrap_or_else(|| DEFAULT_TOOL_LOCK_FILE.to_string())
    }

    /// Get log level directive from configuration
    pub fn get_log_level(&self) -> String {
        let level = self.log_level.clone().unwrap_or_default();
        match &level[..] {
            "OFF" => "off",
            "ERROR" => "error",
            "WARN" => "warn",
            "INFO" => "info",
            "DEBUG" => "debug",
            "TRACE" => "trace",
            _ => "info",
        }
        .to_string()
    }
}
