//! Dynamic DNS for DNSPod.
//!
//! Resolves one domain/sub-domain pair to DNSPod identifiers at startup,
//! then keeps the record's A value equal to this machine's public IP.

pub mod config;
pub mod daemon;
pub mod dns;
pub mod ip;
pub mod secrets;
