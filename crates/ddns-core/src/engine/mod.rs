//! Record reconciliation engine
//!
//! The [`Reconciler`] is responsible for:
//! - Querying existing record sets for each domain
//! - Classifying each domain as no-op or upsert
//! - Submitting a single-value upsert when needed
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ResolvedIp   ┌──────────────┐
//! │ IpResolver  │───────────────▶│  Reconciler  │
//! └─────────────┘                └──────────────┘
//!                                       │  (one domain at a time)
//!                        ┌──────────────┴──────────────┐
//!                        ▼                             ▼
//!               ┌─────────────────┐          ┌──────────────────┐
//!               │ list_record_sets│          │change_record_sets│
//!               │ (classify)      │          │ (apply, UPSERT)  │
//!               └─────────────────┘          └──────────────────┘
//! ```
//!
//! ## Flow
//!
//! 1. Resolve the IP once for the whole run
//! 2. For each domain, in order: query, classify
//! 3. If the action is `Upsert`, submit one change batch
//! 4. Collect the per-domain outcomes into a [`ReconcileReport`]
//!
//! Domains are processed strictly sequentially. Hosted-zone APIs enforce a
//! small per-account request rate, and one query plus at most one change per
//! domain stays under it without a limiter.

pub mod classify;
pub mod report;

pub use classify::{Classification, ReconcileAction, classify_record_sets};
pub use report::{DomainOutcome, DomainReport, ReconcileReport};

use crate::config::{
    FailurePolicy, MultiValuePolicy, ReconcileOptions, ReconcileRequest, RecordType,
};
use crate::error::Result;
use crate::resolver::{IpResolver, ResolvedIp};
use crate::traits::{
    Change, ChangeAction, ChangeBatch, ChangeInfo, ChangeRequest, DnsBackend, RecordSet,
    RecordSetQuery,
};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

/// Build the single-operation upsert for `domain`
///
/// The record set is fully replaced, so a multi-value set collapses to the
/// resolved IP alone.
pub fn build_change_request(
    hosted_zone_id: &str,
    domain: &str,
    record_type: RecordType,
    ttl: u32,
    ip: &ResolvedIp,
    submitted_at: DateTime<Utc>,
) -> ChangeRequest {
    ChangeRequest {
        hosted_zone_id: hosted_zone_id.to_string(),
        batch: ChangeBatch {
            comment: change_comment(ip, submitted_at),
            changes: vec![Change {
                action: ChangeAction::Upsert,
                record_set: RecordSet::new(
                    domain,
                    record_type.as_str(),
                    Some(ttl),
                    [ip.to_string()],
                ),
            }],
        },
    }
}

fn change_comment(ip: &ResolvedIp, at: DateTime<Utc>) -> String {
    format!(
        "Updating public ip {} to resource record set at {}",
        ip,
        at.format("%a, %d %b %Y %H:%M:%S GMT")
    )
}

/// Reconciles record sets in one hosted zone against a resolved IP
pub struct Reconciler {
    backend: Box<dyn DnsBackend>,
    options: ReconcileOptions,
}

impl Reconciler {
    pub fn new(backend: Box<dyn DnsBackend>, options: ReconcileOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Decide whether `domain` needs an upsert
    ///
    /// # Errors
    ///
    /// `Error::Query` when the backend listing fails.
    pub async fn classify(
        &self,
        domain: &str,
        record_type: RecordType,
        hosted_zone_id: &str,
        ip: &ResolvedIp,
    ) -> Result<ReconcileAction> {
        let query = RecordSetQuery::new(hosted_zone_id, domain, record_type.as_str());
        debug!(
            "Listing record sets in {} starting at {} ({}) via {}",
            hosted_zone_id,
            domain,
            record_type,
            self.backend.backend_name()
        );

        if classify::never_matches_listing(domain) {
            warn!(
                "{} is never reported under this name by hosted zone listings; it will be upserted on every run",
                domain
            );
        }

        let record_sets = self.backend.list_record_sets(&query).await.map_err(|e| {
            error!(
                "Failed to obtain resource record sets for {} in hosted zone {}: {}",
                domain, hosted_zone_id, e
            );
            e
        })?;

        let policy = self.options.multi_value_policy;
        if policy == MultiValuePolicy::LastValueWins
            && let Some(matched) = classify::find_matching(&record_sets, domain)
            && matched.values.len() > 1
        {
            warn!(
                "Record set for {} holds {} values; the last one decides the outcome",
                domain,
                matched.values.len()
            );
        }

        let classification = classify_record_sets(&record_sets, domain, ip, policy);
        match classification {
            Classification::NoRecordSets | Classification::NoMatchingName => {
                info!(
                    "No existing record set for {} in specified hosted zone, will create a new record set",
                    domain
                );
            }
            Classification::Outdated => {
                warn!(
                    "Network public ip address is different from the one in the record set for {}, will update the record set",
                    domain
                );
            }
            Classification::AlreadyCurrent => {
                info!(
                    "Network public ip address is already the same as the one set in the target resource record for {}, nothing further to do",
                    domain
                );
            }
        }

        Ok(classification.action())
    }

    /// Upsert `domain` to hold exactly `ip`
    ///
    /// Fire-and-forget with respect to propagation: the returned
    /// [`ChangeInfo`] is not polled.
    ///
    /// # Errors
    ///
    /// `Error::Apply` when the backend rejects the change.
    pub async fn apply(
        &self,
        domain: &str,
        record_type: RecordType,
        ttl: u32,
        ip: &ResolvedIp,
        hosted_zone_id: &str,
    ) -> Result<ChangeInfo> {
        let request =
            build_change_request(hosted_zone_id, domain, record_type, ttl, ip, Utc::now());
        debug!("Submitting change batch: {:?}", request.batch);

        let change = self.backend.change_record_sets(&request).await.map_err(|e| {
            error!(
                "Failed to create/update resource record set for {} in hosted zone {}: {}",
                domain, hosted_zone_id, e
            );
            e
        })?;

        info!(
            "Resource record set for {} has been created/updated! {}",
            domain,
            serde_json::to_string_pretty(&change)?
        );
        Ok(change)
    }

    /// Classify one domain and apply if needed
    pub async fn reconcile_domain(
        &self,
        request: &ReconcileRequest,
        domain: &str,
        ip: &ResolvedIp,
    ) -> Result<DomainOutcome> {
        let action = self
            .classify(domain, request.record_type, &request.hosted_zone_id, ip)
            .await?;

        match action {
            ReconcileAction::NoOp => Ok(DomainOutcome::Unchanged),
            ReconcileAction::Upsert => {
                let change = self
                    .apply(
                        domain,
                        request.record_type,
                        request.ttl,
                        ip,
                        &request.hosted_zone_id,
                    )
                    .await?;
                Ok(DomainOutcome::Upserted { change })
            }
        }
    }

    /// Reconcile every domain in `request`, in order
    ///
    /// With [`FailurePolicy::Abort`] the first failing domain stops the run
    /// and its error is returned. With [`FailurePolicy::Continue`] failures
    /// are recorded in the report and the remaining domains still run.
    pub async fn run(&self, request: &ReconcileRequest, ip: &ResolvedIp) -> Result<ReconcileReport> {
        request.validate()?;
        self.run_validated(request, ip).await
    }

    async fn run_validated(
        &self,
        request: &ReconcileRequest,
        ip: &ResolvedIp,
    ) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::new(*ip);
        for domain in &request.domains {
            match self.reconcile_domain(request, domain, ip).await {
                Ok(outcome) => {
                    report.domains.push(DomainReport {
                        domain: domain.clone(),
                        action: outcome.settled_action(),
                        outcome,
                    });
                }
                Err(e) if self.options.failure_policy == FailurePolicy::Continue && !e.is_fatal() => {
                    warn!("Skipping {} after failure: {}", domain, e);
                    let action = matches!(e, crate::Error::Apply(_)).then_some(ReconcileAction::Upsert);
                    report.domains.push(DomainReport {
                        domain: domain.clone(),
                        action,
                        outcome: DomainOutcome::Failed {
                            error: e.to_string(),
                        },
                    });
                }
                Err(e) => {
                    error!("Aborting run at {}: {}", domain, e);
                    return Err(e);
                }
            }
        }

        info!(
            "Reconciled {} domain(s): {} unchanged, {} upserted, {} failed",
            report.domains.len(),
            report.unchanged_count(),
            report.upserted_count(),
            report.failed_count()
        );
        if !report.is_success() {
            error!("Failed domains: {}", report.failed_domains().join(", "));
        }

        Ok(report)
    }
}

/// Resolve the IP once, then reconcile every domain against it
///
/// An invalid or unresolvable IP stops here, before any backend call.
pub async fn update_record_sets(
    resolver: &IpResolver,
    reconciler: &Reconciler,
    request: &ReconcileRequest,
) -> Result<ReconcileReport> {
    request.validate()?;
    let ip = resolver.resolve(request.explicit_ip.as_deref()).await?;
    reconciler.run_validated(request, &ip).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn change_request_holds_one_upsert_with_the_ip() {
        let ip = ResolvedIp::parse("203.0.113.5").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();

        let request = build_change_request("Z123", "new.example.com", RecordType::A, 60, &ip, at);

        assert_eq!(request.hosted_zone_id, "Z123");
        assert_eq!(request.batch.changes.len(), 1);
        let change = &request.batch.changes[0];
        assert_eq!(change.action, ChangeAction::Upsert);
        assert_eq!(
            change.record_set,
            RecordSet::new("new.example.com", "A", Some(60), ["203.0.113.5"])
        );
        assert_eq!(
            request.batch.comment,
            "Updating public ip 203.0.113.5 to resource record set at Sun, 18 Oct 2026 09:30:00 GMT"
        );
    }

    #[test]
    fn change_request_passes_record_type_through() {
        let ip = ResolvedIp::parse("198.51.100.1").unwrap();
        let request =
            build_change_request("Z9", "txt.example.com", RecordType::Txt, 300, &ip, Utc::now());

        let set = &request.batch.changes[0].record_set;
        assert_eq!(set.record_type, "TXT");
        assert_eq!(set.ttl, Some(300));
    }
}
