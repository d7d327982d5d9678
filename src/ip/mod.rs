mod external;

pub use external::{extract_ip, PageIpSource, DEFAULT_IP_LOOKUP_URL};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IpLookupError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("IP lookup request failed")]
    Transport(#[source] reqwest::Error),

    #[error("no IP address found in the lookup page")]
    NotFound,
}

/// Where the machine's current public IP comes from.
#[async_trait]
pub trait PublicIpSource: Send + Sync {
    async fn current(&self) -> Result<String, IpLookupError>;
}
