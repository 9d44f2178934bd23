// # DNS Backend Trait
//
// Defines the interface for reading and writing record sets in a hosted zone.
//
// ## Implementations
//
// - AWS Route53: `ddns-provider-route53` crate
// - In-memory zones: `ddns_core::backend::MemoryBackend`
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::traits::{DnsBackend, RecordSetQuery};
//
// #[tokio::main]
// async fn main() -> ddns_core::Result<()> {
//     let backend = /* DnsBackend implementation */;
//
//     let sets = backend
//         .list_record_sets(&RecordSetQuery::new("Z123", "home.example.com", "A"))
//         .await?;
//
//     for set in sets {
//         println!("{} {} {:?}", set.name, set.record_type, set.values);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Listing request: record sets in a zone starting at `(start_name, start_type)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSetQuery {
    pub hosted_zone_id: String,
    pub start_name: String,
    pub start_type: String,
}

impl RecordSetQuery {
    pub fn new(
        hosted_zone_id: impl Into<String>,
        start_name: impl Into<String>,
        start_type: impl Into<String>,
    ) -> Self {
        Self {
            hosted_zone_id: hosted_zone_id.into(),
            start_name: start_name.into(),
            start_type: start_type.into(),
        }
    }
}

/// A record set as seen by the backend
///
/// `name` is whatever the backend reports; hosted zones usually return the
/// FQDN form with a trailing `.`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub values: Vec<String>,
}

impl RecordSet {
    pub fn new<I, S>(
        name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: Option<u32>,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            ttl,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Name with a single trailing root-zone `.` removed
    pub fn name_without_root(&self) -> &str {
        self.name.strip_suffix('.').unwrap_or(&self.name)
    }
}

/// Change operation kind
///
/// Only upserts exist: records are never deleted or retyped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    /// Create if absent, else fully replace, at name+type
    Upsert,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Upsert => "UPSERT",
        }
    }
}

/// A single operation in a change batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub action: ChangeAction,
    pub record_set: RecordSet,
}

/// Operations submitted together, with an informational comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBatch {
    pub comment: String,
    pub changes: Vec<Change>,
}

/// A change batch addressed to a hosted zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub hosted_zone_id: String,
    pub batch: ChangeBatch,
}

/// Change-tracking metadata returned by the backend
///
/// Surfaced for observability only; the reconciler never polls it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInfo {
    pub id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Trait for DNS backend implementations
///
/// A backend exposes exactly two operations against a hosted zone: list
/// record sets from a starting point, and submit a change batch.
///
/// ## Allowed Capabilities
/// - ✅ One API call per method invocation
/// - ✅ Map provider responses and errors into core types
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (errors propagate to the caller)
/// - ❌ Decide whether an update is needed (owned by the reconciler)
/// - ❌ Poll for change propagation
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// List record sets in lexicographic order starting at the query's
    /// name and type
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<RecordSet>)`: Zero or more record sets, in backend order
    /// - `Err(Error::Query)`: The listing failed
    async fn list_record_sets(
        &self,
        query: &RecordSetQuery,
    ) -> Result<Vec<RecordSet>, crate::Error>;

    /// Submit a change batch
    ///
    /// # Returns
    ///
    /// - `Ok(ChangeInfo)`: The backend accepted the batch
    /// - `Err(Error::Apply)`: The backend rejected it
    async fn change_record_sets(
        &self,
        request: &ChangeRequest,
    ) -> Result<ChangeInfo, crate::Error>;

    /// Get the backend name (for logging)
    fn backend_name(&self) -> &'static str;
}
