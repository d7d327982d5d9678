use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dnspod_ddns::config::Settings;
use dnspod_ddns::daemon::{self, RunOutcome};
use dnspod_ddns::dns::DnspodProvider;
use dnspod_ddns::ip::{PageIpSource, PublicIpSource};
use dnspod_ddns::secrets::CredentialStore;

#[derive(Parser)]
#[command(name = "dnspod-ddns")]
#[command(about = "Keeps a DNSPod A record pointed at this machine's public IP")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the record and keep it in sync with the public IP
    Daemon,

    /// Show the current public IP and the stored record value
    Check,

    /// Store DNSPod login credentials
    SetKey,

    /// Delete stored DNSPod login credentials
    DeleteKey,

    /// Show configuration file location and contents
    Config,
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(Settings::config_path);
    let settings = Settings::load_from(&config_path);

    let log_level = settings
        .as_ref()
        .map(|s| s.daemon.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&log_level);

    match execute(cli.command, &config_path, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            daemon::log_fatal(&e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(command: Commands, config_path: &Path, settings: Result<Settings>) -> Result<()> {
    match command {
        Commands::Daemon => {
            let settings = settings?;
            info!("Starting dnspod-ddns daemon");
            match daemon::run(settings).await? {
                RunOutcome::Stopped => info!("Daemon stopped"),
                RunOutcome::RestartRequired => {
                    info!("Restart dnspod-ddns to start keeping the record up to date")
                }
            }
        }

        Commands::Check => {
            check_status(&settings?).await?;
        }

        Commands::SetKey => {
            use std::io::{self, Write};

            print!("Login email: ");
            io::stdout().flush()?;
            let mut email = String::new();
            io::stdin().read_line(&mut email)?;
            let email = email.trim();

            let password = rpassword::prompt_password("Login password: ")?;

            let store = CredentialStore::beside(config_path);
            store.store_credentials(email, &password)?;
            println!("Credentials stored in {}", store.path().display());
        }

        Commands::DeleteKey => {
            let store = CredentialStore::beside(config_path);
            store.delete_credentials()?;
            println!("Credentials deleted from {}", store.path().display());
        }

        Commands::Config => {
            show_config(config_path, settings)?;
        }
    }

    Ok(())
}

async fn check_status(settings: &Settings) -> Result<()> {
    let timeout = settings.request_timeout();

    println!("Checking public IP...\n");

    let ip_source = PageIpSource::new(settings.endpoints.ip_lookup_url.as_str(), timeout)?;
    match ip_source.current().await {
        Ok(ip) => println!("Public IP: {}", ip),
        Err(e) => println!("Public IP: Error - {}", e),
    }

    println!("\nChecking DNS record...\n");

    let provider = DnspodProvider::new(
        settings.credentials()?,
        settings.endpoints.api_base.as_str(),
        timeout,
    )?;
    let name = format!("{}.{}", settings.target.sub_domain, settings.target.domain);

    match daemon::lookup(&provider, &settings.target).await {
        Ok(lookup) => match (lookup.domain, lookup.record) {
            (None, _) => println!("{}: domain not in account", name),
            (Some(domain), None) => println!(
                "{}: domain id {}, no default-line A record",
                name, domain.id
            ),
            (Some(domain), Some(record)) => println!(
                "{}: domain id {}, record id {} -> {}",
                name, domain.id, record.id, record.value
            ),
        },
        Err(e) => println!("{}: Error - {}", name, e),
    }

    Ok(())
}

fn show_config(config_path: &Path, settings: Result<Settings>) -> Result<()> {
    println!("Configuration file location: {}\n", config_path.display());

    match settings {
        Ok(s) => {
            println!("Current configuration:\n");
            println!("{}", toml::to_string_pretty(&s.redacted())?);
        }
        Err(e) => {
            println!("Configuration not loaded: {:#}", e);
            println!("\nCreate a configuration file at the location above.");
            println!("Example configuration:\n");
            println!(
                r#"[daemon]
interval_seconds = 300
log_level = "info"

[account]
email = "user@example.com"
password = "secret"

[target]
domain = "example.com"
sub_domain = "home"
"#
            );
        }
    }

    Ok(())
}
