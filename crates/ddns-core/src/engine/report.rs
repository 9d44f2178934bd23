//! Per-run outcome reporting

use crate::engine::classify::ReconcileAction;
use crate::resolver::ResolvedIp;
use crate::traits::ChangeInfo;
use serde::Serialize;

/// What happened to one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DomainOutcome {
    /// Already pointing at the resolved IP
    Unchanged,
    /// Upsert submitted
    Upserted { change: ChangeInfo },
    /// Query or apply failed
    Failed { error: String },
}

impl DomainOutcome {
    /// Action implied by a completed outcome; `None` for a failure, whose
    /// action depends on which step failed
    pub fn settled_action(&self) -> Option<ReconcileAction> {
        match self {
            DomainOutcome::Unchanged => Some(ReconcileAction::NoOp),
            DomainOutcome::Upserted { .. } => Some(ReconcileAction::Upsert),
            DomainOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainReport {
    pub domain: String,
    /// `None` when the query failed before a decision was made
    pub action: Option<ReconcileAction>,
    #[serde(flatten)]
    pub outcome: DomainOutcome,
}

/// Aggregate result of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub ip: ResolvedIp,
    pub domains: Vec<DomainReport>,
}

impl ReconcileReport {
    pub fn new(ip: ResolvedIp) -> Self {
        Self {
            ip,
            domains: Vec::new(),
        }
    }

    pub fn unchanged_count(&self) -> usize {
        self.count(|o| matches!(o, DomainOutcome::Unchanged))
    }

    pub fn upserted_count(&self) -> usize {
        self.count(|o| matches!(o, DomainOutcome::Upserted { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, DomainOutcome::Failed { .. }))
    }

    /// Domains whose query or apply failed, in processing order
    pub fn failed_domains(&self) -> Vec<&str> {
        self.domains
            .iter()
            .filter(|d| matches!(d.outcome, DomainOutcome::Failed { .. }))
            .map(|d| d.domain.as_str())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    fn count(&self, pred: impl Fn(&DomainOutcome) -> bool) -> usize {
        self.domains.iter().filter(|d| pred(&d.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_outcome() {
        let mut report = ReconcileReport::new(ResolvedIp::parse("203.0.113.5").unwrap());
        report.domains.push(DomainReport {
            domain: "a.example.com".to_string(),
            action: Some(ReconcileAction::NoOp),
            outcome: DomainOutcome::Unchanged,
        });
        report.domains.push(DomainReport {
            domain: "b.example.com".to_string(),
            action: Some(ReconcileAction::Upsert),
            outcome: DomainOutcome::Upserted {
                change: ChangeInfo {
                    id: "/change/C1".to_string(),
                    status: "PENDING".to_string(),
                    submitted_at: None,
                    comment: None,
                },
            },
        });
        report.domains.push(DomainReport {
            domain: "c.example.com".to_string(),
            action: None,
            outcome: DomainOutcome::Failed {
                error: "boom".to_string(),
            },
        });

        assert_eq!(
            report.domains.iter().map(|d| d.outcome.settled_action()).collect::<Vec<_>>(),
            vec![Some(ReconcileAction::NoOp), Some(ReconcileAction::Upsert), None]
        );
        assert_eq!(report.unchanged_count(), 1);
        assert_eq!(report.upserted_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failed_domains(), vec!["c.example.com"]);
        assert!(!report.is_success());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ip"], "203.0.113.5");
        assert_eq!(json["domains"][2]["outcome"], "failed");
        assert_eq!(json["domains"][1]["action"], "UPSERT");
    }
}
