//! Test doubles for the provider and public-IP capabilities.

#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use dnspod_ddns::config::TargetConfig;
use dnspod_ddns::dns::{
    classify, DnsProvider, Domain, ProviderError, ProviderId, Record, RecordDetail, DEFAULT_LINE,
};
use dnspod_ddns::ip::{IpLookupError, PublicIpSource};

pub fn target(domain: &str, sub_domain: &str) -> TargetConfig {
    TargetConfig {
        domain: domain.to_string(),
        sub_domain: sub_domain.to_string(),
    }
}

pub fn domain(id: &str, name: &str) -> Domain {
    Domain {
        id: ProviderId::new(id),
        name: name.to_string(),
    }
}

pub fn a_record(id: &str, name: &str, value: &str) -> Record {
    Record {
        id: ProviderId::new(id),
        name: name.to_string(),
        line: DEFAULT_LINE.to_string(),
        record_type: "A".to_string(),
        value: value.to_string(),
    }
}

pub fn api_error(endpoint: &'static str, code: &str) -> ProviderError {
    ProviderError::Api {
        endpoint,
        outcome: classify(code),
        message: format!("status {}", code),
    }
}

pub fn transport_error(endpoint: &'static str) -> ProviderError {
    let source = serde_json::from_str::<serde_json::Value>("<html>502</html>").unwrap_err();
    ProviderError::Decode { endpoint, source }
}

/// What a mocked endpoint should do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Failure {
    None,
    Transport,
    Status(&'static str),
}

impl Failure {
    fn check(self, endpoint: &'static str) -> Result<(), ProviderError> {
        match self {
            Failure::None => Ok(()),
            Failure::Transport => Err(transport_error(endpoint)),
            Failure::Status(code) => Err(api_error(endpoint, code)),
        }
    }
}

#[derive(Default)]
struct Calls {
    list_domains: AtomicUsize,
    create_domain: AtomicUsize,
    list_records: AtomicUsize,
    create_record: AtomicUsize,
    record_info: AtomicUsize,
    ddns_update: AtomicUsize,
}

/// In-memory DNSPod account holding domains and records.
///
/// `Record.Ddns` sets the record to `origin_ip`, the address the provider
/// would see the request coming from.
pub struct MockDnsProvider {
    domains: Mutex<Vec<Domain>>,
    records: Mutex<Vec<Record>>,
    origin_ip: Mutex<String>,
    list_domains_failure: Mutex<Failure>,
    create_failure: Mutex<Failure>,
    record_info_failure: Mutex<Failure>,
    ddns_failure: Mutex<Failure>,
    created_record_values: Mutex<Vec<String>>,
    calls: Calls,
}

impl MockDnsProvider {
    pub fn new(domains: Vec<Domain>, records: Vec<Record>) -> Self {
        Self {
            domains: Mutex::new(domains),
            records: Mutex::new(records),
            origin_ip: Mutex::new(String::new()),
            list_domains_failure: Mutex::new(Failure::None),
            create_failure: Mutex::new(Failure::None),
            record_info_failure: Mutex::new(Failure::None),
            ddns_failure: Mutex::new(Failure::None),
            created_record_values: Mutex::new(Vec::new()),
            calls: Calls::default(),
        }
    }

    pub fn set_origin_ip(&self, ip: &str) {
        *self.origin_ip.lock().unwrap() = ip.to_string();
    }

    pub fn fail_list_domains(&self, failure: Failure) {
        *self.list_domains_failure.lock().unwrap() = failure;
    }

    pub fn fail_create(&self, failure: Failure) {
        *self.create_failure.lock().unwrap() = failure;
    }

    pub fn fail_record_info(&self, failure: Failure) {
        *self.record_info_failure.lock().unwrap() = failure;
    }

    pub fn fail_ddns(&self, failure: Failure) {
        *self.ddns_failure.lock().unwrap() = failure;
    }

    pub fn record_value(&self, record_id: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id.as_str() == record_id)
            .map(|r| r.value.clone())
    }

    pub fn created_record_values(&self) -> Vec<String> {
        self.created_record_values.lock().unwrap().clone()
    }

    pub fn list_domains_calls(&self) -> usize {
        self.calls.list_domains.load(Ordering::SeqCst)
    }

    pub fn create_domain_calls(&self) -> usize {
        self.calls.create_domain.load(Ordering::SeqCst)
    }

    pub fn list_records_calls(&self) -> usize {
        self.calls.list_records.load(Ordering::SeqCst)
    }

    pub fn create_record_calls(&self) -> usize {
        self.calls.create_record.load(Ordering::SeqCst)
    }

    pub fn record_info_calls(&self) -> usize {
        self.calls.record_info.load(Ordering::SeqCst)
    }

    pub fn ddns_calls(&self) -> usize {
        self.calls.ddns_update.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_domains(&self) -> Result<Vec<Domain>, ProviderError> {
        self.calls.list_domains.fetch_add(1, Ordering::SeqCst);
        self.list_domains_failure.lock().unwrap().check("Domain.List")?;
        Ok(self.domains.lock().unwrap().clone())
    }

    async fn create_domain(&self, name: &str) -> Result<Option<ProviderId>, ProviderError> {
        let n = self.calls.create_domain.fetch_add(1, Ordering::SeqCst);
        self.create_failure.lock().unwrap().check("Domain.Create")?;

        let id = ProviderId::new(format!("{}", 100 + n));
        self.domains.lock().unwrap().push(Domain {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(Some(id))
    }

    async fn list_records(&self, _domain_id: &ProviderId) -> Result<Vec<Record>, ProviderError> {
        self.calls.list_records.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create_record(
        &self,
        _domain_id: &ProviderId,
        sub_domain: &str,
        value: &str,
    ) -> Result<Option<ProviderId>, ProviderError> {
        let n = self.calls.create_record.fetch_add(1, Ordering::SeqCst);
        self.created_record_values
            .lock()
            .unwrap()
            .push(value.to_string());
        self.create_failure.lock().unwrap().check("Record.Create")?;

        let id = format!("{}", 200 + n);
        self.records
            .lock()
            .unwrap()
            .push(a_record(&id, sub_domain, value));
        Ok(Some(ProviderId::new(id)))
    }

    async fn record_info(
        &self,
        _domain_id: &ProviderId,
        record_id: &ProviderId,
    ) -> Result<RecordDetail, ProviderError> {
        self.calls.record_info.fetch_add(1, Ordering::SeqCst);
        self.record_info_failure.lock().unwrap().check("Record.Info")?;

        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id == record_id)
            .map(|r| RecordDetail {
                id: r.id.clone(),
                sub_domain: r.name.clone(),
                value: r.value.clone(),
            })
            .ok_or_else(|| api_error("Record.Info", "8"))
    }

    async fn ddns_update(
        &self,
        _domain_id: &ProviderId,
        record_id: &ProviderId,
        _sub_domain: &str,
    ) -> Result<Option<String>, ProviderError> {
        self.calls.ddns_update.fetch_add(1, Ordering::SeqCst);
        self.ddns_failure.lock().unwrap().check("Record.Ddns")?;

        let origin = self.origin_ip.lock().unwrap().clone();
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| &r.id == record_id) {
            record.value = origin.clone();
        }
        Ok(Some(origin))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Public IP source returning a fixed address, or failing on demand.
pub struct StaticIpSource {
    ip: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl StaticIpSource {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: Mutex::new(Some(ip.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            ip: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, ip: Option<&str>) {
        *self.ip.lock().unwrap() = ip.map(str::to_string);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PublicIpSource for StaticIpSource {
    async fn current(&self) -> Result<String, IpLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.ip.lock().unwrap().clone().ok_or(IpLookupError::NotFound)
    }
}

/// In-memory sink for `tracing` output, installed as the thread's default
/// subscriber for the duration of a test.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    /// Lines logged at `level`, e.g. `"ERROR"`.
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.split_whitespace().nth(1) == Some(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
