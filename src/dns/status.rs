//! DNSPod status code classification.
//!
//! Every DNSPod response carries `status.code`. `"1"` is success, anything
//! else is an application-level failure. Known codes map to a fixed message;
//! the rest are reported with their raw code so they can be added later.

use std::fmt;

/// Status code DNSPod uses for a successful call.
pub const SUCCESS_CODE: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Authentication,
    RateLimit,
    Account,
    Domain,
    Record,
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCategory::Authentication => write!(f, "authentication"),
            StatusCategory::RateLimit => write!(f, "rate limit"),
            StatusCategory::Account => write!(f, "account"),
            StatusCategory::Domain => write!(f, "domain"),
            StatusCategory::Record => write!(f, "record"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct KnownStatus {
    pub code: &'static str,
    pub category: StatusCategory,
    pub message: &'static str,
}

const fn known(
    code: &'static str,
    category: StatusCategory,
    message: &'static str,
) -> KnownStatus {
    KnownStatus {
        code,
        category,
        message,
    }
}

/// Status codes returned by the DNSPod endpoints this crate calls.
pub static STATUS_TABLE: &[KnownStatus] = &[
    known("-1", StatusCategory::Authentication, "login failed"),
    known("-2", StatusCategory::RateLimit, "API usage exceeds the limit"),
    known(
        "-7",
        StatusCategory::Account,
        "enterprise account domains must be upgraded to use this feature",
    ),
    known(
        "-8",
        StatusCategory::Account,
        "domains of agent-managed users must be upgraded to use this feature",
    ),
    known("-15", StatusCategory::Domain, "domain is banned"),
    known("6", StatusCategory::Domain, "invalid domain"),
    known("7", StatusCategory::Domain, "domain already exists in this account"),
    known(
        "11",
        StatusCategory::Domain,
        "domain already exists as an alias of another domain",
    ),
    known(
        "12",
        StatusCategory::Domain,
        "domain already exists and is managed by another account",
    ),
    known("21", StatusCategory::Domain, "domain is locked"),
    known("22", StatusCategory::Record, "invalid sub-domain"),
    known("23", StatusCategory::Record, "sub-domain level exceeds the limit"),
    known(
        "24",
        StatusCategory::Record,
        "wildcard sub-domain conflicts with an existing record",
    ),
    known(
        "31",
        StatusCategory::Record,
        "conflicting record exists (A, CNAME and URL records cannot coexist)",
    ),
    known("33", StatusCategory::Record, "AAAA record count exceeds the limit"),
    known(
        "41",
        StatusCategory::Domain,
        "site content violates the DNSPod terms of service, domain not added",
    ),
    known("82", StatusCategory::Record, "IP address is blacklisted"),
    known("83", StatusCategory::Account, "account is locked"),
    known(
        "85",
        StatusCategory::Authentication,
        "login from an unusual location is blocked by account protection",
    ),
    known(
        "500025",
        StatusCategory::Record,
        "A record round-robin count exceeds the limit",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    Success,
    Known(&'static KnownStatus),
    Unknown(String),
}

impl StatusOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StatusOutcome::Success)
    }
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusOutcome::Success => write!(f, "success"),
            StatusOutcome::Known(status) => {
                write!(f, "{} ({} error, code {})", status.message, status.category, status.code)
            }
            StatusOutcome::Unknown(code) => write!(f, "unknown status code {}", code),
        }
    }
}

/// Classify a raw DNSPod status code.
pub fn classify(code: &str) -> StatusOutcome {
    if code == SUCCESS_CODE {
        return StatusOutcome::Success;
    }

    match STATUS_TABLE.iter().find(|status| status.code == code) {
        Some(status) => StatusOutcome::Known(status),
        None => StatusOutcome::Unknown(code.to_string()),
    }
}
