//! Startup resolution of the configured domain and sub-domain into DNSPod
//! identifiers.
//!
//! Missing resources are created. By default a creation ends the run and
//! the daemon has to be started again; with `resume_after_create` the
//! resolver re-queries instead.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::TargetConfig;
use crate::dns::{
    DnsProvider, Domain, ProviderError, ProviderId, Record, DEFAULT_LINE, RECORD_TYPE_A,
};
use crate::ip::PublicIpSource;

/// Upper bound on resolution passes when resuming after creation: domain
/// creation, record creation, final lookup.
const MAX_PASSES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub domain_id: ProviderId,
    pub record_id: ProviderId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedTarget),
    DomainCreated {
        domain_id: Option<ProviderId>,
    },
    RecordCreated {
        domain_id: ProviderId,
        record_id: Option<ProviderId>,
    },
}

/// Read-only view of what the account currently holds for the target.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub domain: Option<Domain>,
    pub record: Option<Record>,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to list domains")]
    ListDomains(#[source] ProviderError),

    #[error("failed to add domain {domain}")]
    CreateDomain {
        domain: String,
        #[source]
        source: ProviderError,
    },

    #[error("failed to list records")]
    ListRecords(#[source] ProviderError),

    #[error("failed to add record {sub_domain}")]
    CreateRecord {
        sub_domain: String,
        #[source]
        source: ProviderError,
    },

    #[error("{domain} could not be resolved after {passes} passes")]
    Unresolved { domain: String, passes: usize },
}

/// First domain whose name matches exactly.
pub fn find_domain<'a>(domains: &'a [Domain], name: &str) -> Option<&'a Domain> {
    domains.iter().find(|d| d.name == name)
}

/// First A record on the default line for `sub_domain`.
pub fn find_record<'a>(records: &'a [Record], sub_domain: &str) -> Option<&'a Record> {
    records.iter().find(|r| {
        r.name == sub_domain && r.record_type == RECORD_TYPE_A && r.line == DEFAULT_LINE
    })
}

/// Resolve the target once, creating the first missing resource.
pub async fn resolve(
    provider: &dyn DnsProvider,
    ip_source: &dyn PublicIpSource,
    target: &TargetConfig,
) -> Result<Resolution, ResolveError> {
    let domains = provider
        .list_domains()
        .await
        .map_err(ResolveError::ListDomains)?;
    info!(op = "login", "logged in to {}", provider.provider_name());

    let domain_id = match find_domain(&domains, &target.domain) {
        Some(domain) => domain.id.clone(),
        None => {
            warn!(op = "domain_id", "domain {} is not in the account", target.domain);
            info!(
                op = "create_domain",
                "adding {}; remember to point its NS records at DNSPod", target.domain
            );

            let domain_id = provider
                .create_domain(&target.domain)
                .await
                .map_err(|source| ResolveError::CreateDomain {
                    domain: target.domain.clone(),
                    source,
                })?;
            info!(op = "create_domain", "domain {} added", target.domain);

            return Ok(Resolution::DomainCreated { domain_id });
        }
    };
    info!(op = "domain_id", "{}", domain_id);

    let records = provider
        .list_records(&domain_id)
        .await
        .map_err(ResolveError::ListRecords)?;

    let record_id = match find_record(&records, &target.sub_domain) {
        Some(record) => record.id.clone(),
        None => {
            warn!(
                op = "record_id",
                "no default-line A record for {}.{}", target.sub_domain, target.domain
            );

            let ip = match ip_source.current().await {
                Ok(ip) => ip,
                Err(e) => {
                    error!(op = "get_ip", "{:#}", anyhow::Error::from(e));
                    String::new()
                }
            };
            info!(
                op = "create_record",
                "adding A record {}.{} -> {:?}", target.sub_domain, target.domain, ip
            );

            let record_id = provider
                .create_record(&domain_id, &target.sub_domain, &ip)
                .await
                .map_err(|source| ResolveError::CreateRecord {
                    sub_domain: target.sub_domain.clone(),
                    source,
                })?;
            info!(op = "create_record", "record {} added", target.sub_domain);

            return Ok(Resolution::RecordCreated {
                domain_id,
                record_id,
            });
        }
    };
    info!(op = "record_id", "{}", record_id);

    Ok(Resolution::Resolved(ResolvedTarget {
        domain_id,
        record_id,
    }))
}

/// Resolve, re-querying after each creation when `resume_after_create` is
/// set. Otherwise identical to [`resolve`].
pub async fn resolve_target(
    provider: &dyn DnsProvider,
    ip_source: &dyn PublicIpSource,
    target: &TargetConfig,
    resume_after_create: bool,
) -> Result<Resolution, ResolveError> {
    if !resume_after_create {
        return resolve(provider, ip_source, target).await;
    }

    for pass in 1..=MAX_PASSES {
        match resolve(provider, ip_source, target).await? {
            Resolution::Resolved(resolved) => return Ok(Resolution::Resolved(resolved)),
            created => info!(op = "resolve", "pass {} created {:?}, re-querying", pass, created),
        }
    }

    Err(ResolveError::Unresolved {
        domain: format!("{}.{}", target.sub_domain, target.domain),
        passes: MAX_PASSES,
    })
}

/// Look the target up without creating anything.
pub async fn lookup(
    provider: &dyn DnsProvider,
    target: &TargetConfig,
) -> Result<Lookup, ResolveError> {
    let domains = provider
        .list_domains()
        .await
        .map_err(ResolveError::ListDomains)?;

    let Some(domain) = find_domain(&domains, &target.domain).cloned() else {
        return Ok(Lookup {
            domain: None,
            record: None,
        });
    };

    let records = provider
        .list_records(&domain.id)
        .await
        .map_err(ResolveError::ListRecords)?;
    let record = find_record(&records, &target.sub_domain).cloned();

    Ok(Lookup {
        domain: Some(domain),
        record,
    })
}
