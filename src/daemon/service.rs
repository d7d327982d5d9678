use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::Settings;
use crate::dns::{DnsProvider, DnspodProvider};
use crate::ip::{PageIpSource, PublicIpSource};

use super::reconcile::Reconciler;
use super::resolver::{resolve_target, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The loop ran and was stopped by a shutdown signal.
    Stopped,
    /// A domain or record was created; start the daemon again to use it.
    RestartRequired,
}

pub async fn run(settings: Settings) -> Result<RunOutcome> {
    let credentials = settings.credentials()?;
    let timeout = settings.request_timeout();

    let provider: Arc<dyn DnsProvider> = Arc::new(DnspodProvider::new(
        credentials,
        settings.endpoints.api_base.as_str(),
        timeout,
    )?);
    let ip_source: Arc<dyn PublicIpSource> = Arc::new(PageIpSource::new(
        settings.endpoints.ip_lookup_url.as_str(),
        timeout,
    )?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown().await {
            error!("Error waiting for shutdown signal: {}", e);
        }
        let _ = shutdown_tx.send(true);
    });

    run_with(provider, ip_source, &settings, shutdown_rx).await
}

/// Resolve the target, then reconcile until `shutdown` fires.
pub async fn run_with(
    provider: Arc<dyn DnsProvider>,
    ip_source: Arc<dyn PublicIpSource>,
    settings: &Settings,
    shutdown: watch::Receiver<bool>,
) -> Result<RunOutcome> {
    let resolution = resolve_target(
        provider.as_ref(),
        ip_source.as_ref(),
        &settings.target,
        settings.daemon.resume_after_create,
    )
    .await?;

    let target = match resolution {
        Resolution::Resolved(target) => target,
        Resolution::DomainCreated { .. } => {
            info!(op = "create_domain", "domain created, restart to continue");
            return Ok(RunOutcome::RestartRequired);
        }
        Resolution::RecordCreated { .. } => {
            info!(op = "create_record", "record created, restart to continue");
            return Ok(RunOutcome::RestartRequired);
        }
    };

    let mut reconciler = Reconciler::new(
        provider,
        ip_source,
        target,
        settings.target.sub_domain.as_str(),
        settings.interval(),
    );
    reconciler.run(shutdown).await;

    Ok(RunOutcome::Stopped)
}

/// Log an error that ends the process, with its whole cause chain on one
/// line. Nothing below `main` logs the errors it returns.
pub fn log_fatal(err: &anyhow::Error) {
    error!(op = "startup", "{:#}", err);
}

async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }

    Ok(())
}
