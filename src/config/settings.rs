use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::dns::{Credentials, DNSPOD_API_BASE};
use crate::ip::DEFAULT_IP_LOOKUP_URL;
use crate::secrets::CredentialStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountConfig>,
    pub target: TargetConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(skip)]
    source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Keep going after creating the domain or record instead of exiting.
    #[serde(default)]
    pub resume_after_create: bool,
}

fn default_interval() -> u64 {
    300 // 5 minutes
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    pub domain: String,
    pub sub_domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
}

fn default_api_base() -> String {
    DNSPOD_API_BASE.to_string()
}

fn default_ip_lookup_url() -> String {
    DEFAULT_IP_LOOKUP_URL.to_string()
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        settings.source = Some(config_path.to_path_buf());

        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.target.domain.trim().is_empty() {
            bail!("target.domain must not be empty");
        }
        if self.target.sub_domain.trim().is_empty() {
            bail!("target.sub_domain must not be empty (use \"@\" for the apex)");
        }
        if self.daemon.interval_seconds == 0 {
            bail!("daemon.interval_seconds must be greater than zero");
        }
        if self.daemon.request_timeout_seconds == 0 {
            bail!("daemon.request_timeout_seconds must be greater than zero");
        }
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        #[cfg(unix)]
        {
            PathBuf::from("/etc/dnspod-ddns")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\ProgramData\dnspod-ddns")
        }
    }

    /// Path the settings were loaded from, if they came from a file.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.daemon.interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.daemon.request_timeout_seconds)
    }

    /// Inline `[account]` credentials, otherwise the stored ones next to the
    /// config file.
    pub fn credentials(&self) -> Result<Credentials> {
        if let Some(account) = &self.account {
            return Ok(Credentials {
                login_email: account.email.clone(),
                login_password: account.password.clone(),
            });
        }

        let store = match self.source() {
            Some(path) => CredentialStore::beside(path),
            None => CredentialStore::default_location(),
        };
        store.get_credentials()
    }

    /// Copy of the settings that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(account) = copy.account.as_mut() {
            account.password = "********".to_string();
        }
        copy
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
            log_level: default_log_level(),
            request_timeout_seconds: default_request_timeout(),
            resume_after_create: false,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            ip_lookup_url: default_ip_lookup_url(),
        }
    }
}
