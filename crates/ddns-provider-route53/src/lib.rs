// # Route53 DNS Backend
//
// This crate provides the AWS Route53 backend for the DDNS updater.
//
// ## Behavior
//
// - ✅ One API call per trait method (ListResourceRecordSets / ChangeResourceRecordSets)
// - ✅ Service errors mapped to descriptive `Error::Query` / `Error::Apply` messages
// - ✅ Dry-run mode for safe testing
// - ✅ Credentials from a named profile, resolved once at startup
// - ❌ NO retry logic beyond the SDK's own transport behavior
// - ❌ NO polling of change status (ChangeInfo is returned as submitted)
//
// ## Rate Limits
//
// Route53 allows five requests per second per account. The reconciler issues
// at most two calls per domain, strictly one after the other.
//
// ## API Reference
//
// - List: GET `/2013-04-01/hostedzone/{Id}/rrset?name=...&type=...`
// - Change: POST `/2013-04-01/hostedzone/{Id}/rrset` with a ChangeBatch

use async_trait::async_trait;
use aws_sdk_route53::Client;
use aws_sdk_route53::config::{BehaviorVersion, Region};
use aws_sdk_route53::error::{DisplayErrorContext, SdkError};
use aws_sdk_route53::operation::change_resource_record_sets::ChangeResourceRecordSetsError;
use aws_sdk_route53::operation::list_resource_record_sets::ListResourceRecordSetsError;
use aws_sdk_route53::primitives::DateTimeFormat;
use aws_sdk_route53::types;
use ddns_core::traits::{
    ChangeAction, ChangeBatch, ChangeInfo, ChangeRequest, DnsBackend, RecordSet, RecordSetQuery,
};
use ddns_core::{Error, Result};

/// Profile used when none is given
pub const DEFAULT_PROFILE: &str = "default";

/// Region used when none is given
pub const DEFAULT_REGION: &str = "ap-southeast-1";

/// Named-profile credentials and region for the Route53 client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsProfile {
    pub profile: String,
    pub region: String,
}

impl AwsProfile {
    pub fn new(profile: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            region: region.into(),
        }
    }
}

impl Default for AwsProfile {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE, DEFAULT_REGION)
    }
}

/// Route53 backend
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the backend will:
/// - Perform all listing requests
/// - Log the intended change batch as JSON
/// - **NOT** submit it, returning a synthetic `ChangeInfo` instead
pub struct Route53Backend {
    client: Client,
    dry_run: bool,
}

impl std::fmt::Debug for Route53Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Backend")
            .field("region", &self.client.config().region())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Route53Backend {
    /// Wrap an already-configured client
    pub fn new(client: Client, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// Build a client from a named profile and region
    ///
    /// Credentials are resolved lazily by the SDK on the first call and
    /// cached for the rest of the run.
    pub async fn connect(profile: &AwsProfile, dry_run: bool) -> Result<Self> {
        if profile.profile.trim().is_empty() {
            return Err(Error::config("AWS profile name cannot be empty"));
        }
        if profile.region.trim().is_empty() {
            return Err(Error::config("AWS region cannot be empty"));
        }

        tracing::debug!(
            "Loading AWS configuration for profile {} in {}",
            profile.profile,
            profile.region
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&profile.profile)
            .region(Region::new(profile.region.clone()))
            .load()
            .await;

        if dry_run {
            tracing::warn!("Route53 backend running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self::new(Client::new(&config), dry_run))
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[async_trait]
impl DnsBackend for Route53Backend {
    async fn list_record_sets(&self, query: &RecordSetQuery) -> Result<Vec<RecordSet>> {
        tracing::debug!(
            "ListResourceRecordSets zone={} name={} type={}",
            query.hosted_zone_id,
            query.start_name,
            query.start_type
        );

        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(&query.hosted_zone_id)
            .start_record_name(&query.start_name)
            .start_record_type(types::RrType::from(query.start_type.as_str()))
            .send()
            .await
            .map_err(|e| Error::query(describe_list_error(&query.hosted_zone_id, e)))?;

        Ok(output
            .resource_record_sets()
            .iter()
            .map(from_sdk_record_set)
            .collect())
    }

    async fn change_record_sets(&self, request: &ChangeRequest) -> Result<ChangeInfo> {
        if self.dry_run {
            let payload = serde_json::to_string(request)?;
            tracing::info!(
                "[DRY-RUN] Would send ChangeResourceRecordSets to {} with payload: {}",
                request.hosted_zone_id,
                payload
            );
            return Ok(ChangeInfo {
                id: "dry-run".to_string(),
                status: "DRY_RUN".to_string(),
                submitted_at: None,
                comment: Some(request.batch.comment.clone()),
            });
        }

        let batch = to_sdk_change_batch(&request.batch)?;
        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&request.hosted_zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| Error::apply(describe_change_error(&request.hosted_zone_id, e)))?;

        let info = output
            .change_info()
            .ok_or_else(|| Error::apply("Route53 response is missing ChangeInfo"))?;

        Ok(ChangeInfo {
            id: info.id().to_string(),
            status: info.status().as_str().to_string(),
            submitted_at: info.submitted_at().fmt(DateTimeFormat::DateTime).ok(),
            comment: info.comment().map(str::to_string),
        })
    }

    fn backend_name(&self) -> &'static str {
        "route53"
    }
}

fn from_sdk_record_set(set: &types::ResourceRecordSet) -> RecordSet {
    RecordSet {
        name: set.name().to_string(),
        record_type: set.r#type().as_str().to_string(),
        ttl: set.ttl().and_then(|ttl| u32::try_from(ttl).ok()),
        values: set
            .resource_records()
            .iter()
            .map(|record| record.value().to_string())
            .collect(),
    }
}

fn to_sdk_change_batch(batch: &ChangeBatch) -> Result<types::ChangeBatch> {
    let invalid = |e: aws_sdk_route53::error::BuildError| {
        Error::apply(format!("Invalid change batch: {}", e))
    };

    let mut builder = types::ChangeBatch::builder().comment(&batch.comment);
    for change in &batch.changes {
        let set = &change.record_set;

        let mut record_set = types::ResourceRecordSet::builder()
            .name(&set.name)
            .r#type(types::RrType::from(set.record_type.as_str()));
        if let Some(ttl) = set.ttl {
            record_set = record_set.ttl(i64::from(ttl));
        }
        for value in &set.values {
            record_set = record_set
                .resource_records(types::ResourceRecord::builder().value(value).build().map_err(invalid)?);
        }

        let action = match change.action {
            ChangeAction::Upsert => types::ChangeAction::Upsert,
        };

        builder = builder.changes(
            types::Change::builder()
                .action(action)
                .resource_record_set(record_set.build().map_err(invalid)?)
                .build()
                .map_err(invalid)?,
        );
    }

    builder.build().map_err(invalid)
}

fn describe_list_error(
    hosted_zone_id: &str,
    err: SdkError<ListResourceRecordSetsError>,
) -> String {
    match err.as_service_error() {
        Some(ListResourceRecordSetsError::NoSuchHostedZone(_)) => {
            format!("No such hosted zone: {}", hosted_zone_id)
        }
        Some(ListResourceRecordSetsError::InvalidInput(e)) => {
            format!("Invalid input: {}", e.message().unwrap_or("no details"))
        }
        _ => format!("ListResourceRecordSets failed: {}", DisplayErrorContext(&err)),
    }
}

fn describe_change_error(
    hosted_zone_id: &str,
    err: SdkError<ChangeResourceRecordSetsError>,
) -> String {
    match err.as_service_error() {
        Some(ChangeResourceRecordSetsError::NoSuchHostedZone(_)) => {
            format!("No such hosted zone: {}", hosted_zone_id)
        }
        Some(ChangeResourceRecordSetsError::InvalidChangeBatch(e)) => format!(
            "Invalid change batch: {}",
            e.messages().join("; ")
        ),
        Some(ChangeResourceRecordSetsError::InvalidInput(e)) => {
            format!("Invalid input: {}", e.message().unwrap_or("no details"))
        }
        Some(ChangeResourceRecordSetsError::PriorRequestNotComplete(_)) => {
            "Rate limit exceeded or a prior change is still pending. Please retry later.".to_string()
        }
        _ => format!("ChangeResourceRecordSets failed: {}", DisplayErrorContext(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddns_core::traits::Change;

    fn upsert_batch(values: &[&str]) -> ChangeBatch {
        ChangeBatch {
            comment: "Updating public ip 203.0.113.5".to_string(),
            changes: vec![Change {
                action: ChangeAction::Upsert,
                record_set: RecordSet::new("new.example.com", "A", Some(60), values.iter().copied()),
            }],
        }
    }

    #[test]
    fn change_batch_maps_to_sdk_types() {
        let batch = to_sdk_change_batch(&upsert_batch(&["203.0.113.5"])).unwrap();

        assert_eq!(batch.comment(), Some("Updating public ip 203.0.113.5"));
        assert_eq!(batch.changes().len(), 1);

        let change = &batch.changes()[0];
        assert_eq!(change.action(), &types::ChangeAction::Upsert);

        let set = change.resource_record_set().unwrap();
        assert_eq!(set.name(), "new.example.com");
        assert_eq!(set.r#type(), &types::RrType::A);
        assert_eq!(set.ttl(), Some(60));
        assert_eq!(set.resource_records().len(), 1);
        assert_eq!(set.resource_records()[0].value(), "203.0.113.5");
    }

    #[test]
    fn record_set_maps_from_sdk_types() {
        let sdk = types::ResourceRecordSet::builder()
            .name("home.example.com.")
            .r#type(types::RrType::A)
            .ttl(300)
            .resource_records(types::ResourceRecord::builder().value("198.51.100.1").build().unwrap())
            .resource_records(types::ResourceRecord::builder().value("198.51.100.2").build().unwrap())
            .build()
            .unwrap();

        let set = from_sdk_record_set(&sdk);

        assert_eq!(set.name, "home.example.com.");
        assert_eq!(set.name_without_root(), "home.example.com");
        assert_eq!(set.record_type, "A");
        assert_eq!(set.ttl, Some(300));
        assert_eq!(set.values, vec!["198.51.100.1", "198.51.100.2"]);
    }

    #[test]
    fn alias_record_maps_to_empty_values() {
        let sdk = types::ResourceRecordSet::builder()
            .name("alias.example.com.")
            .r#type(types::RrType::A)
            .build()
            .unwrap();

        let set = from_sdk_record_set(&sdk);
        assert!(set.values.is_empty());
        assert_eq!(set.ttl, None);
    }

    #[test]
    fn every_record_type_is_known_to_the_sdk() {
        for record_type in ddns_core::RecordType::ALL {
            assert!(
                types::RrType::values().contains(&record_type.as_str()),
                "{} should map to a known RRType",
                record_type
            );
            assert_eq!(types::RrType::from(record_type.as_str()).as_str(), record_type.as_str());
        }
    }

    #[test]
    fn default_profile_matches_cli_defaults() {
        let profile = AwsProfile::default();
        assert_eq!(profile.profile, "default");
        assert_eq!(profile.region, "ap-southeast-1");
    }

    #[tokio::test]
    async fn connect_rejects_blank_profile() {
        let result = Route53Backend::connect(&AwsProfile::new(" ", "us-east-1"), true).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn dry_run_never_calls_the_api() {
        // Unreachable endpoint: any real request would fail
        let config = aws_sdk_route53::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url("http://127.0.0.1:9")
            .build();
        let backend = Route53Backend::new(Client::from_conf(config), true);

        let request = ChangeRequest {
            hosted_zone_id: "Z123".to_string(),
            batch: upsert_batch(&["203.0.113.5"]),
        };
        let info = backend.change_record_sets(&request).await.unwrap();

        assert_eq!(info.id, "dry-run");
        assert_eq!(info.status, "DRY_RUN");
        assert_eq!(info.comment.as_deref(), Some("Updating public ip 203.0.113.5"));
    }
}
