mod dnspod;
mod error;
mod provider;
pub mod status;
mod types;

pub use dnspod::{DnspodProvider, DNSPOD_API_BASE};
pub use error::ProviderError;
pub use provider::{Credentials, DnsProvider, DEFAULT_LINE, RECORD_TYPE_A};
pub use status::{classify, StatusCategory, StatusOutcome};
pub use types::{Domain, ProviderId, Record, RecordDetail};
