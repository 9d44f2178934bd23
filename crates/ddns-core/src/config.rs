//! Configuration types for the DDNS updater
//!
//! A [`ReconcileRequest`] describes one invocation: which hosted zone, which
//! domains, what record type and TTL, and an optional IP override.
//! [`ReconcileOptions`] tunes how the reconciler treats ambiguous record sets
//! and per-domain failures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// TTL applied when the caller does not set one
pub const DEFAULT_TTL_SECS: u32 = 60;

/// DNS record set type
///
/// The type is passed through to the backend unchanged; the reconciler
/// applies the same type to every domain in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    #[default]
    A,
    Aaaa,
    Caa,
    Cname,
    Ds,
    Mx,
    Naptr,
    Ns,
    Ptr,
    Soa,
    Spf,
    Srv,
    Txt,
}

impl RecordType {
    /// Every supported record type, in declaration order
    pub const ALL: [RecordType; 13] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Caa,
        RecordType::Cname,
        RecordType::Ds,
        RecordType::Mx,
        RecordType::Naptr,
        RecordType::Ns,
        RecordType::Ptr,
        RecordType::Soa,
        RecordType::Spf,
        RecordType::Srv,
        RecordType::Txt,
    ];

    /// Wire name of the type (e.g. `"AAAA"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Ds => "DS",
            RecordType::Mx => "MX",
            RecordType::Naptr => "NAPTR",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Soa => "SOA",
            RecordType::Spf => "SPF",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                crate::Error::config(format!(
                    "Unsupported record type '{}'. Supported types: {}",
                    s,
                    RecordType::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }
}

/// One reconciliation pass over a hosted zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// Hosted zone holding the record sets (opaque to the core)
    pub hosted_zone_id: String,

    /// Domains to reconcile, processed in order
    pub domains: Vec<String>,

    /// Record type applied to every domain
    #[serde(default)]
    pub record_type: RecordType,

    /// TTL in seconds for upserted record sets
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Caller-supplied IPv4 address; skips the network lookup when set
    #[serde(default)]
    pub explicit_ip: Option<String>,
}

impl ReconcileRequest {
    /// Create a request for an `A` record with the default TTL
    pub fn new<I, S>(hosted_zone_id: impl Into<String>, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosted_zone_id: hosted_zone_id.into(),
            domains: domains.into_iter().map(Into::into).collect(),
            record_type: RecordType::default(),
            ttl: DEFAULT_TTL_SECS,
            explicit_ip: None,
        }
    }

    /// Set the record type
    pub fn with_record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = record_type;
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set an explicit IP override
    pub fn with_explicit_ip(mut self, ip: impl Into<String>) -> Self {
        self.explicit_ip = Some(ip.into());
        self
    }

    /// Validate the request
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.hosted_zone_id.trim().is_empty() {
            return Err(crate::Error::config("Hosted zone id cannot be empty"));
        }

        if self.domains.is_empty() {
            return Err(crate::Error::config("At least one domain is required"));
        }

        for domain in &self.domains {
            validate_domain_name(domain)?;
        }

        Ok(())
    }
}

fn default_ttl() -> u32 {
    DEFAULT_TTL_SECS
}

/// Validate that a string is a plausible record set name
///
/// Basic RFC 1035 shape checks plus the underscore labels hosted zones
/// accept. A single trailing root `.` is allowed. A leading `*` label is
/// allowed too.
///
/// Both forms pass validation but never compare equal to a listed name:
/// listed names lose their root `.` before comparison, and hosted zones list
/// wildcards escaped (`\052.example.com.`). The reconciler upserts such
/// domains on every run and warns when it does.
pub fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    if domain.is_empty() {
        return Err(crate::Error::config("Domain name cannot be empty"));
    }

    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    let name = domain.strip_suffix('.').unwrap_or(domain);

    for (index, label) in name.split('.').enumerate() {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if index == 0 && label == "*" {
            continue;
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(crate::Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

/// How a matched record set holding several values is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiValuePolicy {
    /// Each value overwrites the running result; the last value decides
    #[default]
    LastValueWins,
    /// No-op only for a single value equal to the resolved IP
    RequireSingleton,
}

/// What happens to the remaining domains when one of them fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing domain and propagate its error
    #[default]
    Abort,
    /// Record the failure and carry on with the next domain
    Continue,
}

/// Reconciler tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileOptions {
    #[serde(default)]
    pub multi_value_policy: MultiValuePolicy,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl ReconcileOptions {
    pub fn with_multi_value_policy(mut self, policy: MultiValuePolicy) -> Self {
        self.multi_value_policy = policy;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
