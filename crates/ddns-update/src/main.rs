// # ddns-update - Route53 record set updater
//
// Single-pass command: resolve the public IP once, then make every listed
// domain in one hosted zone point at it. No daemon, no persisted state.
//
// The binary is a thin integration layer:
// 1. Parse flags / DDNS_* environment variables
// 2. Initialize logging and the runtime
// 3. Build the IP source and the Route53 backend
// 4. Hand everything to `ddns_core::update_record_sets`
//
// ## Example
//
// ```bash
// ddns-update update-record-set \
//     --hosted-zone-id Z0123456789ABC \
//     --domain home.example.com,vpn.example.com \
//     --profile home --region ap-southeast-1
// ```

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, UpdateRecordSetArgs};
use ddns_core::{IpResolver, ReconcileReport, Reconciler};
use ddns_ip_http::HttpIpSource;
use ddns_provider_route53::Route53Backend;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Every domain is current or was updated
/// - 1: Configuration or startup error
/// - 2: Runtime error, including any failed domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                DdnsExitCode::ConfigError.into()
            } else {
                // --help / --version
                DdnsExitCode::Success.into()
            };
        }
    };

    let Command::UpdateRecordSet(args) = cli.command;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!(
        "Running {}:update-record-set@{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let request = args.request();
    if let Err(e) = request.validate() {
        error!("Invalid configuration: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match update_record_sets(&args).await {
            Ok(report) if report.is_success() => DdnsExitCode::Success,
            Ok(report) => {
                error!(
                    "{} of {} domain(s) failed",
                    report.failed_count(),
                    report.domains.len()
                );
                DdnsExitCode::RuntimeError
            }
            Err(e) => {
                error!("{:#}", e);
                exit_code_for(&e)
            }
        }
    })
    .into()
}

async fn update_record_sets(args: &UpdateRecordSetArgs) -> Result<ReconcileReport> {
    let ip_source = HttpIpSource::new(&args.ip_echo_url).context("Invalid --ip-echo-url")?;
    let backend = Route53Backend::connect(&args.aws_profile(), args.dry_run)
        .await
        .context("Failed to set up the Route53 client")?;

    info!(
        "Updating {} domain(s) in hosted zone {} (profile {}, region {})",
        args.domains.len(),
        args.hosted_zone_id,
        args.profile,
        args.region
    );

    let resolver = IpResolver::new(Box::new(ip_source));
    let reconciler = Reconciler::new(Box::new(backend), args.options());

    Ok(ddns_core::update_record_sets(&resolver, &reconciler, &args.request()).await?)
}

fn exit_code_for(err: &anyhow::Error) -> DdnsExitCode {
    match err.downcast_ref::<ddns_core::Error>() {
        Some(ddns_core::Error::Config(_)) => DdnsExitCode::ConfigError,
        _ => DdnsExitCode::RuntimeError,
    }
}
