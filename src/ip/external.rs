use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;

use super::{IpLookupError, PublicIpSource};

pub const DEFAULT_IP_LOOKUP_URL: &str = "http://ip.cn";

/// The lookup page embeds the caller's address as `<code>1.2.3.4</code>`.
static IP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<code>([^\n]+?)</code>").expect("IP pattern is a valid regex")
});

/// Pull the first embedded address out of a lookup page, verbatim.
pub fn extract_ip(page: &str) -> Option<&str> {
    IP_PATTERN
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Scrapes the public IP from an HTML page.
pub struct PageIpSource {
    client: Client,
    url: String,
}

impl PageIpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, IpLookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(IpLookupError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PublicIpSource for PageIpSource {
    async fn current(&self) -> Result<String, IpLookupError> {
        let page = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(IpLookupError::Transport)?
            .text()
            .await
            .map_err(IpLookupError::Transport)?;

        extract_ip(&page)
            .map(str::to_string)
            .ok_or(IpLookupError::NotFound)
    }
}
