use std::fmt;

use serde::{Deserialize, Deserializer};

/// Identifier assigned by DNSPod.
///
/// Most endpoints send ids as JSON strings, but `Domain.List` and
/// `Record.Ddns` send numbers. Both decode into the same string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProviderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => ProviderId(s),
            RawId::Unsigned(n) => ProviderId(n.to_string()),
            RawId::Signed(n) => ProviderId(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Domain {
    pub id: ProviderId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub id: ProviderId,
    pub name: String,
    #[serde(default)]
    pub line: String,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub value: String,
}

/// Record returned by `Record.Info`, which names the host `sub_domain`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDetail {
    pub id: ProviderId,
    #[serde(default)]
    pub sub_domain: String,
    pub value: String,
}

/// Identifier-only payload returned by the create calls.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResource {
    pub id: ProviderId,
}

/// Record echoed back by `Record.Ddns` after the provider applied the update.
#[derive(Debug, Clone, Deserialize)]
pub struct DdnsRecord {
    pub id: ProviderId,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DomainListResponse {
    pub status: Status,
    #[serde(default)]
    pub domains: Vec<Domain>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DomainCreateResponse {
    pub status: Status,
    pub domain: Option<CreatedResource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordListResponse {
    pub status: Status,
    #[serde(default)]
    pub records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordCreateResponse {
    pub status: Status,
    pub record: Option<CreatedResource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordInfoResponse {
    pub status: Status,
    pub record: Option<RecordDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordDdnsResponse {
    pub status: Status,
    pub record: Option<DdnsRecord>,
}
