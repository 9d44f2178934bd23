//! Record set classification
//!
//! Pure decision logic: given what the backend returned for a domain, decide
//! whether the record set already points at the resolved IP.

use crate::config::MultiValuePolicy;
use crate::resolver::ResolvedIp;
use crate::traits::RecordSet;
use serde::Serialize;

/// What the reconciler must do for one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconcileAction {
    /// The published value already matches
    NoOp,
    /// Create or replace the record set
    Upsert,
}

/// Why a domain got its action
///
/// Only used to pick log messages; the apply step sees the
/// [`ReconcileAction`] alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The listing came back empty
    NoRecordSets,
    /// The listing had entries but none for this domain
    NoMatchingName,
    /// The matching record set already holds the IP
    AlreadyCurrent,
    /// The matching record set holds something else
    Outdated,
}

impl Classification {
    pub fn action(&self) -> ReconcileAction {
        match self {
            Classification::AlreadyCurrent => ReconcileAction::NoOp,
            Classification::NoRecordSets
            | Classification::NoMatchingName
            | Classification::Outdated => ReconcileAction::Upsert,
        }
    }
}

/// Find the first record set whose root-stripped name equals `domain`
///
/// Comparison is exact and case-sensitive.
pub fn find_matching<'a>(record_sets: &'a [RecordSet], domain: &str) -> Option<&'a RecordSet> {
    record_sets
        .iter()
        .find(|set| set.name_without_root() == domain)
}

/// Whether `domain` is spelled in a form listings never report
///
/// Listed names are compared without their root `.`, and wildcard names are
/// listed escaped as `\052`.
pub fn never_matches_listing(domain: &str) -> bool {
    domain.ends_with('.') || domain == "*" || domain.starts_with("*.")
}

/// Classify the listing returned for `domain`
pub fn classify_record_sets(
    record_sets: &[RecordSet],
    domain: &str,
    ip: &ResolvedIp,
    policy: MultiValuePolicy,
) -> Classification {
    if record_sets.is_empty() {
        return Classification::NoRecordSets;
    }

    let Some(matched) = find_matching(record_sets, domain) else {
        return Classification::NoMatchingName;
    };

    match policy {
        MultiValuePolicy::LastValueWins => matched
            .values
            .iter()
            .fold(Classification::Outdated, |_, value| {
                if ip.matches(value) {
                    Classification::AlreadyCurrent
                } else {
                    Classification::Outdated
                }
            }),
        MultiValuePolicy::RequireSingleton => match matched.values.as_slice() {
            [only] if ip.matches(only) => Classification::AlreadyCurrent,
            _ => Classification::Outdated,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> ResolvedIp {
        ResolvedIp::parse(s).unwrap()
    }

    fn a_record(name: &str, values: &[&str]) -> RecordSet {
        RecordSet::new(name, "A", Some(60), values.iter().copied())
    }

    #[test]
    fn rooted_and_wildcard_names_never_match() {
        assert!(never_matches_listing("new.example.com."));
        assert!(never_matches_listing("*.example.com"));
        assert!(!never_matches_listing("new.example.com"));
        assert!(!never_matches_listing("_acme-challenge.example.com"));
    }

    #[test]
    fn empty_listing_is_first_creation() {
        let result = classify_record_sets(
            &[],
            "new.example.com",
            &ip("203.0.113.5"),
            MultiValuePolicy::LastValueWins,
        );
        assert_eq!(result, Classification::NoRecordSets);
        assert_eq!(result.action(), ReconcileAction::Upsert);
    }

    #[test]
    fn neighbouring_records_do_not_match() {
        let sets = vec![a_record("other.example.com.", &["203.0.113.5"])];
        let result = classify_record_sets(
            &sets,
            "new.example.com",
            &ip("203.0.113.5"),
            MultiValuePolicy::LastValueWins,
        );
        assert_eq!(result, Classification::NoMatchingName);
        assert_eq!(result.action(), ReconcileAction::Upsert);
    }

    #[test]
    fn name_comparison_is_case_sensitive() {
        let sets = vec![a_record("Home.example.com.", &["203.0.113.5"])];
        let result = classify_record_sets(
            &sets,
            "home.example.com",
            &ip("203.0.113.5"),
            MultiValuePolicy::LastValueWins,
        );
        assert_eq!(result, Classification::NoMatchingName);
    }

    #[test]
    fn trailing_dot_matches() {
        let sets = vec![a_record("example.com.", &["198.51.100.1"])];
        let result = classify_record_sets(
            &sets,
            "example.com",
            &ip("198.51.100.1"),
            MultiValuePolicy::LastValueWins,
        );
        assert_eq!(result, Classification::AlreadyCurrent);
        assert_eq!(result.action(), ReconcileAction::NoOp);
    }

    #[test]
    fn different_value_is_outdated() {
        let sets = vec![a_record("b.example.com.", &["203.0.113.9"])];
        let result = classify_record_sets(
            &sets,
            "b.example.com",
            &ip("203.0.113.5"),
            MultiValuePolicy::LastValueWins,
        );
        assert_eq!(result, Classification::Outdated);
    }

    #[test]
    fn first_matching_set_is_used() {
        let sets = vec![
            a_record("a.example.com.", &["203.0.113.5"]),
            RecordSet::new("a.example.com.", "TXT", Some(300), ["\"hello\""]),
        ];
        let result = classify_record_sets(
            &sets,
            "a.example.com",
            &ip("203.0.113.5"),
            MultiValuePolicy::LastValueWins,
        );
        assert_eq!(result, Classification::AlreadyCurrent);
    }

    #[test]
    fn matched_set_without_values_is_outdated() {
        let sets = vec![a_record("alias.example.com.", &[])];
        let result = classify_record_sets(
            &sets,
            "alias.example.com",
            &ip("203.0.113.5"),
            MultiValuePolicy::LastValueWins,
        );
        assert_eq!(result, Classification::Outdated);
    }

    #[test]
    fn last_value_wins_follows_iteration_order() {
        let ip = ip("203.0.113.5");

        let ends_with_match = vec![a_record("m.example.com.", &["203.0.113.9", "203.0.113.5"])];
        assert_eq!(
            classify_record_sets(&ends_with_match, "m.example.com", &ip, MultiValuePolicy::LastValueWins),
            Classification::AlreadyCurrent
        );

        let ends_with_other = vec![a_record("m.example.com.", &["203.0.113.5", "203.0.113.9"])];
        assert_eq!(
            classify_record_sets(&ends_with_other, "m.example.com", &ip, MultiValuePolicy::LastValueWins),
            Classification::Outdated
        );
    }

    #[test]
    fn require_singleton_upserts_any_multi_value_set() {
        let ip = ip("203.0.113.5");

        let multi = vec![a_record("m.example.com.", &["203.0.113.9", "203.0.113.5"])];
        assert_eq!(
            classify_record_sets(&multi, "m.example.com", &ip, MultiValuePolicy::RequireSingleton),
            Classification::Outdated
        );

        let single = vec![a_record("m.example.com.", &["203.0.113.5"])];
        assert_eq!(
            classify_record_sets(&single, "m.example.com", &ip, MultiValuePolicy::RequireSingleton),
            Classification::AlreadyCurrent
        );
    }
}
