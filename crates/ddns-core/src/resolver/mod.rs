//! IP resolution
//!
//! Produces the single [`ResolvedIp`] a run publishes. An explicit override
//! always wins and is never second-guessed by a network lookup; otherwise
//! the configured [`IpSource`] is asked exactly once.

use crate::error::{Error, Result};
use crate::traits::IpSource;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::{error, info};

/// Check that `s` is a dotted-quad IPv4 address
///
/// Exactly four decimal octets in `[0, 255]`, no leading zeros, no
/// surrounding whitespace.
pub fn is_valid_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

/// A validated IPv4 address, fixed for the lifetime of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedIp(Ipv4Addr);

impl ResolvedIp {
    /// Validate `candidate` as an IPv4 address
    pub fn parse(candidate: &str) -> Option<Self> {
        candidate.parse::<Ipv4Addr>().ok().map(Self)
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.0
    }

    /// Whether a record value is exactly this address
    pub fn matches(&self, value: &str) -> bool {
        value == self.to_string()
    }
}

impl From<Ipv4Addr> for ResolvedIp {
    fn from(addr: Ipv4Addr) -> Self {
        Self(addr)
    }
}

impl fmt::Display for ResolvedIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for ResolvedIp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Resolves the IP address to publish
pub struct IpResolver {
    source: Box<dyn IpSource>,
}

impl IpResolver {
    /// Create a resolver that falls back to `source` when no override is given
    pub fn new(source: Box<dyn IpSource>) -> Self {
        Self { source }
    }

    /// Resolve the IP for this run
    ///
    /// # Errors
    ///
    /// `Error::InvalidIp` when the override is not IPv4, when the lookup
    /// fails, or when the lookup returns something that is not IPv4.
    pub async fn resolve(&self, explicit_ip: Option<&str>) -> Result<ResolvedIp> {
        match explicit_ip {
            Some(candidate) => {
                let ip = ResolvedIp::parse(candidate).ok_or_else(|| {
                    error!("Could not apply the user supplied ip address: {:?}", candidate);
                    Error::invalid_ip(format!(
                        "user supplied value {:?} is not an IPv4 address",
                        candidate
                    ))
                })?;
                info!("The user supplied ip address is: {}", ip);
                Ok(ip)
            }
            None => self.lookup().await,
        }
    }

    async fn lookup(&self) -> Result<ResolvedIp> {
        let body = self.source.current().await.map_err(|e| {
            error!(
                "Could not resolve public ip address of the current network via {}: {}",
                self.source.source_name(),
                e
            );
            Error::invalid_ip(format!("lookup via {} failed: {}", self.source.source_name(), e))
        })?;

        let candidate = body.trim();
        let ip = ResolvedIp::parse(candidate).ok_or_else(|| {
            error!(
                "Could not resolve public ip address of the current network: {} returned {:?}",
                self.source.source_name(),
                candidate
            );
            Error::invalid_ip(format!(
                "{} returned {:?}, which is not an IPv4 address",
                self.source.source_name(),
                candidate
            ))
        })?;

        info!("The current public ip address of this network is: {}", ip);
        Ok(ip)
    }
}
