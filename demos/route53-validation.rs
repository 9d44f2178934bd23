// # Route53 Backend Real Environment Validation Tool
//
// Exercises the Route53 backend against a real hosted zone: one query, one
// upsert, then a second pass to confirm the record is reported as current.
//
// ## Usage
//
// ```bash
// # Dry-run mode (default - safe)
// DDNS_MODE=dry-run \
// DDNS_HOSTED_ZONE_ID=Z0123456789ABC \
// DDNS_RECORD_NAME=ddns-test.example.com \
// DDNS_TEST_IP=203.0.113.5 \
// cargo run -p demos --bin route53_validation
//
// # Live mode (makes actual changes!)
// DDNS_MODE=live \
// DDNS_HOSTED_ZONE_ID=Z0123456789ABC \
// DDNS_RECORD_NAME=ddns-test.example.com \
// DDNS_TEST_IP=203.0.113.5 \
// cargo run -p demos --bin route53_validation
// ```
//
// ## Environment Variables
//
// Required:
// - `DDNS_HOSTED_ZONE_ID`: Hosted zone holding the test record
// - `DDNS_RECORD_NAME`: Full record name (e.g., "ddns-test.example.com")
// - `DDNS_TEST_IP`: IPv4 address to write
//
// Optional:
// - `DDNS_AWS_PROFILE`: Named profile (default: default)
// - `DDNS_AWS_REGION`: Region (default: ap-southeast-1)
// - `DDNS_MODE`: "dry-run" or "live" (default: dry-run)

use ddns_core::{ReconcileAction, ReconcileOptions, Reconciler, RecordType, ResolvedIp};
use ddns_provider_route53::{AwsProfile, DEFAULT_PROFILE, DEFAULT_REGION, Route53Backend};
use std::env;
use std::process::ExitCode;

fn required(name: &str) -> Option<String> {
    let value = env::var(name).ok().filter(|v| !v.trim().is_empty());
    if value.is_none() {
        tracing::error!("{} environment variable is required", name);
    }
    value
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("=== Route53 Backend Real Environment Validation ===");

    let (Some(zone), Some(record_name), Some(test_ip)) = (
        required("DDNS_HOSTED_ZONE_ID"),
        required("DDNS_RECORD_NAME"),
        required("DDNS_TEST_IP"),
    ) else {
        return ExitCode::FAILURE;
    };

    let profile = AwsProfile::new(
        env::var("DDNS_AWS_PROFILE").unwrap_or_else(|_| DEFAULT_PROFILE.to_string()),
        env::var("DDNS_AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
    );
    let mode = env::var("DDNS_MODE").unwrap_or_else(|_| "dry-run".to_string());
    let dry_run = !mode.eq_ignore_ascii_case("live");

    if dry_run {
        tracing::warn!("Running in DRY-RUN mode - no changes will be made");
    } else {
        tracing::warn!("Running in LIVE mode - will make actual DNS changes!");
    }

    tracing::info!("Configuration:");
    tracing::info!("  Zone: {}", zone);
    tracing::info!("  Record: {}", record_name);
    tracing::info!("  Test IP: {}", test_ip);
    tracing::info!("  Profile: {} ({})", profile.profile, profile.region);

    let Some(ip) = ResolvedIp::parse(&test_ip) else {
        tracing::error!("DDNS_TEST_IP is not a valid IPv4 address: {}", test_ip);
        return ExitCode::FAILURE;
    };

    tracing::info!("--- Step 1: Creating Route53 backend ---");
    let backend = match Route53Backend::connect(&profile, dry_run).await {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("✗ Backend setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let reconciler = Reconciler::new(Box::new(backend), ReconcileOptions::default());

    tracing::info!("--- Step 2: Classifying record ---");
    let action = match reconciler.classify(&record_name, RecordType::A, &zone, &ip).await {
        Ok(action) => action,
        Err(e) => {
            tracing::error!("✗ Query failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("✓ Classified as {:?}", action);

    if action == ReconcileAction::Upsert {
        tracing::info!("--- Step 3: Applying upsert ---");
        match reconciler.apply(&record_name, RecordType::A, 60, &ip, &zone).await {
            Ok(change) => tracing::info!("✓ Change {} submitted ({})", change.id, change.status),
            Err(e) => {
                tracing::error!("✗ Upsert failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    if !dry_run {
        tracing::info!("--- Step 4: Testing idempotency ---");
        match reconciler.classify(&record_name, RecordType::A, &zone, &ip).await {
            Ok(ReconcileAction::NoOp) => tracing::info!("✓ Idempotency verified"),
            Ok(ReconcileAction::Upsert) => {
                tracing::warn!("⚠ Record still classified as outdated (change may be propagating)")
            }
            Err(e) => {
                tracing::error!("✗ Idempotency check failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    if dry_run {
        tracing::info!("=== DRY-RUN COMPLETE ===");
        tracing::info!("No changes were made. To make actual changes, set DDNS_MODE=live");
    } else {
        tracing::info!("=== LIVE MODE COMPLETE ===");
    }

    ExitCode::SUCCESS
}
