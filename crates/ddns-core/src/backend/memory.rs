// # Memory Backend
//
// In-memory implementation of DnsBackend.
//
// ## Purpose
//
// Holds hosted zones in a map so the reconciler can run end to end without a
// DNS provider. Useful for tests, demos and dry runs of a configuration.
//
// ## Listing Semantics
//
// Mirrors a hosted-zone listing API closely enough for reconciliation:
// - Names are stored in FQDN form (trailing `.`)
// - Record sets are ordered by (name, type)
// - A listing starts at the first entry >= (start name, start type) and
//   returns at most `MAX_ITEMS` entries, which may belong to other names

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::traits::dns_backend::{
    ChangeAction, ChangeInfo, ChangeRequest, DnsBackend, RecordSet, RecordSetQuery,
};
use crate::Error;

/// Upper bound on entries returned by one listing
pub const MAX_ITEMS: usize = 100;

type Zone = BTreeMap<(String, String), RecordSet>;

fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

/// In-memory hosted zones
///
/// Cloning shares the underlying zones, so a test can keep a handle while the
/// reconciler owns another.
///
/// # Example
///
/// ```rust,no_run
/// use ddns_core::backend::MemoryBackend;
/// use ddns_core::traits::RecordSet;
///
/// #[tokio::main]
/// async fn main() {
///     let backend = MemoryBackend::new();
///     backend
///         .insert("Z123", RecordSet::new("home.example.com", "A", Some(60), ["198.51.100.1"]))
///         .await;
///
///     assert_eq!(backend.values("Z123", "home.example.com", "A").await, Some(vec!["198.51.100.1".to_string()]));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    zones: Arc<RwLock<HashMap<String, Zone>>>,
    change_seq: Arc<AtomicU64>,
}

impl MemoryBackend {
    /// Create a backend with no hosted zones
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty hosted zone (no-op if it exists)
    pub async fn create_zone(&self, hosted_zone_id: &str) {
        self.zones
            .write()
            .await
            .entry(hosted_zone_id.to_string())
            .or_default();
    }

    /// Insert or replace a record set, creating the zone if needed
    pub async fn insert(&self, hosted_zone_id: &str, record_set: RecordSet) {
        let mut zones = self.zones.write().await;
        let zone = zones.entry(hosted_zone_id.to_string()).or_default();
        let name = fqdn(&record_set.name);
        zone.insert(
            (name.clone(), record_set.record_type.clone()),
            RecordSet { name, ..record_set },
        );
    }

    /// Values currently held at `name`+`record_type`
    pub async fn values(
        &self,
        hosted_zone_id: &str,
        name: &str,
        record_type: &str,
    ) -> Option<Vec<String>> {
        self.zones
            .read()
            .await
            .get(hosted_zone_id)?
            .get(&(fqdn(name), record_type.to_string()))
            .map(|set| set.values.clone())
    }

    /// Number of record sets in a zone
    pub async fn len(&self, hosted_zone_id: &str) -> usize {
        self.zones
            .read()
            .await
            .get(hosted_zone_id)
            .map_or(0, |zone| zone.len())
    }

    /// Number of change batches accepted so far
    pub fn change_count(&self) -> u64 {
        self.change_seq.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsBackend for MemoryBackend {
    async fn list_record_sets(&self, query: &RecordSetQuery) -> Result<Vec<RecordSet>, Error> {
        let zones = self.zones.read().await;
        let zone = zones.get(&query.hosted_zone_id).ok_or_else(|| {
            Error::query(format!("No such hosted zone: {}", query.hosted_zone_id))
        })?;

        let start = (fqdn(&query.start_name), query.start_type.clone());
        Ok(zone
            .range(start..)
            .take(MAX_ITEMS)
            .map(|(_, set)| set.clone())
            .collect())
    }

    async fn change_record_sets(&self, request: &ChangeRequest) -> Result<ChangeInfo, Error> {
        let mut zones = self.zones.write().await;
        let zone = zones.get_mut(&request.hosted_zone_id).ok_or_else(|| {
            Error::apply(format!("No such hosted zone: {}", request.hosted_zone_id))
        })?;

        if request.batch.changes.is_empty() {
            return Err(Error::apply("Change batch must contain at least one change"));
        }

        for change in &request.batch.changes {
            if change.record_set.values.is_empty() {
                return Err(Error::apply(format!(
                    "Record set {} has no values",
                    change.record_set.name
                )));
            }
        }

        for change in &request.batch.changes {
            match change.action {
                ChangeAction::Upsert => {
                    let name = fqdn(&change.record_set.name);
                    zone.insert(
                        (name.clone(), change.record_set.record_type.clone()),
                        RecordSet {
                            name,
                            ..change.record_set.clone()
                        },
                    );
                }
            }
        }

        let seq = self.change_seq.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Memory backend applied change batch {}", seq);

        Ok(ChangeInfo {
            id: format!("/change/C{}", seq),
            status: "INSYNC".to_string(),
            submitted_at: Some(chrono::Utc::now().to_rfc3339()),
            comment: Some(request.batch.comment.clone()),
        })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
