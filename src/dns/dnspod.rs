use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ProviderError;
use super::provider::{Credentials, DnsProvider, DEFAULT_LINE, RECORD_TYPE_A};
use super::status::classify;
use super::types::{
    Domain, DomainCreateResponse, DomainListResponse, ProviderId, Record, RecordCreateResponse,
    RecordDdnsResponse, RecordDetail, RecordInfoResponse, RecordListResponse, Status,
};

pub const DNSPOD_API_BASE: &str = "https://dnsapi.cn";

const DOMAIN_LIST: &str = "Domain.List";
const DOMAIN_CREATE: &str = "Domain.Create";
const RECORD_LIST: &str = "Record.List";
const RECORD_CREATE: &str = "Record.Create";
const RECORD_INFO: &str = "Record.Info";
const RECORD_DDNS: &str = "Record.Ddns";

pub struct DnspodProvider {
    client: Client,
    api_base: String,
    credentials: Credentials,
}

impl DnspodProvider {
    pub fn new(
        credentials: Credentials,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::Client)?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_base, endpoint)
    }

    /// POST a form to `endpoint` and decode the JSON envelope.
    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let mut form: Vec<(&str, &str)> = vec![
            ("login_email", self.credentials.login_email.as_str()),
            ("login_password", self.credentials.login_password.as_str()),
            ("format", "json"),
            ("lang", "cn"),
        ];
        form.extend_from_slice(params);

        debug!(op = endpoint, "POST {}", self.endpoint_url(endpoint));

        let body = self
            .client
            .post(self.endpoint_url(endpoint))
            .form(&form)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| ProviderError::Transport { endpoint, source })?
            .text()
            .await
            .map_err(|source| ProviderError::Transport { endpoint, source })?;

        serde_json::from_str(&body).map_err(|source| ProviderError::Decode { endpoint, source })
    }
}

fn check_status(endpoint: &'static str, status: &Status) -> Result<(), ProviderError> {
    debug!(
        op = endpoint,
        "status {} at {:?}", status.code, status.created_at
    );

    let outcome = classify(&status.code);
    if outcome.is_success() {
        return Ok(());
    }

    Err(ProviderError::Api {
        endpoint,
        outcome,
        message: status.message.clone(),
    })
}

#[async_trait]
impl DnsProvider for DnspodProvider {
    async fn list_domains(&self) -> Result<Vec<Domain>, ProviderError> {
        let response: DomainListResponse = self.post(DOMAIN_LIST, &[]).await?;
        check_status(DOMAIN_LIST, &response.status)?;
        Ok(response.domains)
    }

    async fn create_domain(&self, domain: &str) -> Result<Option<ProviderId>, ProviderError> {
        let response: DomainCreateResponse =
            self.post(DOMAIN_CREATE, &[("domain", domain)]).await?;
        check_status(DOMAIN_CREATE, &response.status)?;
        Ok(response.domain.map(|d| d.id))
    }

    async fn list_records(&self, domain_id: &ProviderId) -> Result<Vec<Record>, ProviderError> {
        let response: RecordListResponse = self
            .post(RECORD_LIST, &[("domain_id", domain_id.as_str())])
            .await?;
        check_status(RECORD_LIST, &response.status)?;
        Ok(response.records)
    }

    async fn create_record(
        &self,
        domain_id: &ProviderId,
        sub_domain: &str,
        value: &str,
    ) -> Result<Option<ProviderId>, ProviderError> {
        let response: RecordCreateResponse = self
            .post(
                RECORD_CREATE,
                &[
                    ("domain_id", domain_id.as_str()),
                    ("sub_domain", sub_domain),
                    ("record_type", RECORD_TYPE_A),
                    ("record_line", DEFAULT_LINE),
                    ("value", value),
                ],
            )
            .await?;
        check_status(RECORD_CREATE, &response.status)?;
        Ok(response.record.map(|r| r.id))
    }

    async fn record_info(
        &self,
        domain_id: &ProviderId,
        record_id: &ProviderId,
    ) -> Result<RecordDetail, ProviderError> {
        let response: RecordInfoResponse = self
            .post(
                RECORD_INFO,
                &[
                    ("domain_id", domain_id.as_str()),
                    ("record_id", record_id.as_str()),
                ],
            )
            .await?;
        check_status(RECORD_INFO, &response.status)?;
        response.record.ok_or(ProviderError::MissingField {
            endpoint: RECORD_INFO,
            field: "record",
        })
    }

    async fn ddns_update(
        &self,
        domain_id: &ProviderId,
        record_id: &ProviderId,
        sub_domain: &str,
    ) -> Result<Option<String>, ProviderError> {
        let response: RecordDdnsResponse = self
            .post(
                RECORD_DDNS,
                &[
                    ("domain_id", domain_id.as_str()),
                    ("record_id", record_id.as_str()),
                    ("sub_domain", sub_domain),
                    ("record_line", DEFAULT_LINE),
                ],
            )
            .await?;
        check_status(RECORD_DDNS, &response.status)?;
        Ok(response.record.and_then(|record| {
            debug!(op = RECORD_DDNS, "record {} now {:?}", record.id, record.value);
            record.value
        }))
    }

    fn provider_name(&self) -> &'static str {
        "dnspod"
    }
}
