use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::dns::{DnsProvider, ProviderId};
use crate::ip::PublicIpSource;

use super::resolver::ResolvedTarget;

/// In-memory state of the managed record. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileState {
    pub domain_id: ProviderId,
    pub record_id: ProviderId,
    pub last_known_record_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    RecordInfo,
    PublicIp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Unchanged { ip: String },
    Updated { from: String, to: String },
    UpdateFailed { from: String, to: String },
    Skipped(SkipReason),
}

pub struct Reconciler {
    provider: Arc<dyn DnsProvider>,
    ip_source: Arc<dyn PublicIpSource>,
    sub_domain: String,
    interval: Duration,
    state: ReconcileState,
}

impl Reconciler {
    pub fn new(
        provider: Arc<dyn DnsProvider>,
        ip_source: Arc<dyn PublicIpSource>,
        target: ResolvedTarget,
        sub_domain: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            provider,
            ip_source,
            sub_domain: sub_domain.into(),
            interval,
            state: ReconcileState {
                domain_id: target.domain_id,
                record_id: target.record_id,
                last_known_record_value: None,
            },
        }
    }

    pub fn state(&self) -> &ReconcileState {
        &self.state
    }

    /// One pass of fetch record value, fetch public IP, compare, update.
    ///
    /// Every failure is logged and absorbed; the next cycle starts over.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let record = match self
            .provider
            .record_info(&self.state.domain_id, &self.state.record_id)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                error!(op = "record_info", "{:#}", anyhow::Error::from(e));
                return CycleOutcome::Skipped(SkipReason::RecordInfo);
            }
        };
        self.state.last_known_record_value = Some(record.value.clone());

        let ip = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => {
                error!(op = "get_ip", "{:#}", anyhow::Error::from(e));
                return CycleOutcome::Skipped(SkipReason::PublicIp);
            }
        };

        if ip == record.value {
            info!(
                op = "ip",
                "no IP change detected, next check in {}s",
                self.interval.as_secs()
            );
            return CycleOutcome::Unchanged { ip };
        }

        info!(op = "ip", "{:?} ==> {:?}, updating DNS", record.value, ip);

        let result = self
            .provider
            .ddns_update(&self.state.domain_id, &self.state.record_id, &self.sub_domain)
            .await;

        match result {
            Ok(value) => {
                info!(op = "ddns", "DNS record updated");
                self.state.last_known_record_value = Some(value.unwrap_or_else(|| ip.clone()));
                CycleOutcome::Updated {
                    from: record.value,
                    to: ip,
                }
            }
            Err(e) => {
                error!(op = "ddns", "{:#}", anyhow::Error::from(e));
                CycleOutcome::UpdateFailed {
                    from: record.value,
                    to: ip,
                }
            }
        }
    }

    /// Run cycles until `shutdown` flips to `true` or its sender goes away.
    ///
    /// The first cycle starts immediately; every later one starts a full
    /// interval after the previous one finished.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            op = "loop",
            "monitoring {} every {} seconds",
            self.sub_domain,
            self.interval.as_secs()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(op = "loop", "shutdown signal received, stopping");
    }
}
