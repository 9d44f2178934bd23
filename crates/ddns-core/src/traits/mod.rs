//! Core traits for the DDNS updater
//!
//! This module defines the two seams between the reconciliation engine and
//! the outside world.
//!
//! - [`IpSource`]: Look up the public IP address of the current network
//! - [`DnsBackend`]: Query and upsert record sets in a hosted zone

pub mod ip_source;
pub mod dns_backend;

pub use ip_source::IpSource;
pub use dns_backend::{
    Change, ChangeAction, ChangeBatch, ChangeInfo, ChangeRequest, DnsBackend, RecordSet,
    RecordSetQuery,
};
