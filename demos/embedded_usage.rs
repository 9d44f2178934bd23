//! Minimal embedding example for ddns-core
//!
//! Runs the reconciler against an in-memory hosted zone with a fixed IP
//! source, so it needs neither network access nor AWS credentials. The
//! application owns every component and decides when a pass runs.

use ddns_core::traits::{IpSource, RecordSet};
use ddns_core::{
    DomainOutcome, FailurePolicy, IpResolver, MemoryBackend, ReconcileOptions, ReconcileRequest,
    Reconciler, Result,
};

const ZONE: &str = "ZEMBEDDED";

/// IP source that always answers with the same address
struct FixedIpSource {
    ip: String,
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<String> {
        Ok(self.ip.clone())
    }

    fn source_name(&self) -> &str {
        "fixed"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Embedded ddns-core Example ===\n");

    // Seed the zone: one record already current, one stale
    let backend = MemoryBackend::new();
    backend
        .insert(ZONE, RecordSet::new("a.example.com", "A", Some(60), ["203.0.113.5"]))
        .await;
    backend
        .insert(ZONE, RecordSet::new("b.example.com", "A", Some(60), ["203.0.113.9"]))
        .await;

    let resolver = IpResolver::new(Box::new(FixedIpSource {
        ip: "203.0.113.5\n".to_string(),
    }));
    let reconciler = Reconciler::new(
        Box::new(backend.clone()),
        ReconcileOptions::default().with_failure_policy(FailurePolicy::Continue),
    );

    let request = ReconcileRequest::new(ZONE, ["a.example.com", "b.example.com", "c.example.com"]);

    println!("1. First pass");
    let report = ddns_core::update_record_sets(&resolver, &reconciler, &request).await?;
    for domain in &report.domains {
        let outcome = match &domain.outcome {
            DomainOutcome::Unchanged => "unchanged".to_string(),
            DomainOutcome::Upserted { change } => format!("upserted ({})", change.id),
            DomainOutcome::Failed { error } => format!("failed: {}", error),
        };
        println!("   {} -> {}", domain.domain, outcome);
    }

    println!("\n2. Second pass (nothing should change)");
    let report = ddns_core::update_record_sets(&resolver, &reconciler, &request).await?;
    println!(
        "   {} unchanged, {} upserted",
        report.unchanged_count(),
        report.upserted_count()
    );

    println!("\n3. Zone contents");
    for domain in &request.domains {
        println!(
            "   {} A {:?}",
            domain,
            backend.values(ZONE, domain, "A").await.unwrap_or_default()
        );
    }
    println!("   {} change batch(es) applied", backend.change_count());

    println!("\n=== Embedding Successful ===");
    Ok(())
}
