use std::fmt;

use async_trait::async_trait;

use super::error::ProviderError;
use super::types::{Domain, ProviderId, Record, RecordDetail};

/// Record type managed by this daemon.
pub const RECORD_TYPE_A: &str = "A";

/// DNSPod's name for the default routing line (requests use `lang=cn`).
pub const DEFAULT_LINE: &str = "默认";

#[derive(Clone)]
pub struct Credentials {
    pub login_email: String,
    pub login_password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login_email", &self.login_email)
            .field("login_password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List the domains of the account
    async fn list_domains(&self) -> Result<Vec<Domain>, ProviderError>;

    /// Add a domain to the account
    async fn create_domain(&self, domain: &str) -> Result<Option<ProviderId>, ProviderError>;

    /// List the records of a domain
    async fn list_records(&self, domain_id: &ProviderId) -> Result<Vec<Record>, ProviderError>;

    /// Create an A record on the default line
    async fn create_record(
        &self,
        domain_id: &ProviderId,
        sub_domain: &str,
        value: &str,
    ) -> Result<Option<ProviderId>, ProviderError>;

    /// Get the stored state of one record
    async fn record_info(
        &self,
        domain_id: &ProviderId,
        record_id: &ProviderId,
    ) -> Result<RecordDetail, ProviderError>;

    /// Point the record at the address the request originates from.
    ///
    /// Returns the new value when the provider echoes it back.
    async fn ddns_update(
        &self,
        domain_id: &ProviderId,
        record_id: &ProviderId,
        sub_domain: &str,
    ) -> Result<Option<String>, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
