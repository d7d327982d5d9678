use thiserror::Error;

use super::status::StatusOutcome;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// Network failure, timeout or non-2xx HTTP status.
    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The call went through but `status.code` was not `"1"`.
    #[error("{endpoint} rejected: {outcome} ({message})")]
    Api {
        endpoint: &'static str,
        outcome: StatusOutcome,
        message: String,
    },

    #[error("{endpoint} response is missing `{field}`")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },
}

impl ProviderError {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProviderError::Transport { .. } | ProviderError::Decode { .. }
        )
    }
}
