use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::dns::Credentials;

const CREDENTIALS_FILE: &str = "credentials.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    dnspod: Option<StoredCredentials>,
}

#[derive(Serialize, Deserialize)]
struct StoredCredentials {
    login_email: String,
    login_password: String,
}

impl std::fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("login_email", &self.login_email)
            .finish_non_exhaustive()
    }
}

/// DNSPod login stored in a TOML file readable only by its owner.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        Self::new(Settings::config_dir().join(CREDENTIALS_FILE))
    }

    /// Store living in the same directory as `config_path`.
    pub fn beside(config_path: &Path) -> Self {
        match config_path.parent() {
            Some(dir) => Self::new(dir.join(CREDENTIALS_FILE)),
            None => Self::new(CREDENTIALS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CredentialsFile> {
        if !self.path.exists() {
            return Ok(CredentialsFile::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credentials file: {}", self.path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse credentials file: {}", self.path.display()))
    }

    fn save(&self, creds: &CredentialsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let content = toml::to_string_pretty(creds).context("Failed to serialize credentials")?;

        fs::write(&self.path, &content)
            .with_context(|| format!("Failed to write credentials file: {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms).with_context(|| {
                format!("Failed to set permissions on: {}", self.path.display())
            })?;
        }

        Ok(())
    }

    pub fn store_credentials(&self, login_email: &str, login_password: &str) -> Result<()> {
        let mut creds_file = self.load()?;

        creds_file.dnspod = Some(StoredCredentials {
            login_email: login_email.to_string(),
            login_password: login_password.to_string(),
        });

        self.save(&creds_file)
    }

    pub fn get_credentials(&self) -> Result<Credentials> {
        let stored = self.load()?.dnspod.ok_or_else(|| {
            anyhow!(
                "DNSPod credentials not found in {}. Add an [account] section to the config or run 'dnspod-ddns set-key'.",
                self.path.display()
            )
        })?;

        Ok(Credentials {
            login_email: stored.login_email,
            login_password: stored.login_password,
        })
    }

    pub fn delete_credentials(&self) -> Result<()> {
        let mut creds_file = self.load()?;

        if creds_file.dnspod.take().is_none() {
            return Err(anyhow!(
                "No credentials found in {}",
                self.path.display()
            ));
        }

        self.save(&creds_file)
    }
}
