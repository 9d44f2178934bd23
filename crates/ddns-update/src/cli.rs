//! Command-line surface
//!
//! Every flag can also be supplied through a `DDNS_*` environment variable,
//! so the binary runs unchanged from a shell, a cron entry or a container.

use clap::{Args, Parser, Subcommand};
use ddns_core::{
    FailurePolicy, MultiValuePolicy, ReconcileOptions, ReconcileRequest, RecordType,
};
use ddns_ip_http::DEFAULT_IP_ECHO_URL;
use ddns_provider_route53::{AwsProfile, DEFAULT_PROFILE, DEFAULT_REGION};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "ddns-update", version)]
#[command(about = "Point Route53 record sets at this network's public IP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or update record sets so they hold the current public IP
    UpdateRecordSet(UpdateRecordSetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct UpdateRecordSetArgs {
    /// Hosted zone ID, e.g. Z0123456789ABC
    #[arg(short = 'z', long, env = "DDNS_HOSTED_ZONE_ID")]
    pub hosted_zone_id: String,

    /// Domain to update; repeat the flag or separate with commas
    #[arg(
        short = 'd',
        long = "domain",
        env = "DDNS_DOMAINS",
        value_delimiter = ',',
        required = true
    )]
    pub domains: Vec<String>,

    /// Record type
    #[arg(short = 't', long = "type", env = "DDNS_RECORD_TYPE", default_value = "A")]
    pub record_type: RecordType,

    /// TTL in seconds for created or updated record sets
    #[arg(short = 'l', long, env = "DDNS_TTL", default_value_t = ddns_core::config::DEFAULT_TTL_SECS)]
    pub ttl: u32,

    /// AWS named profile
    #[arg(short = 'p', long, env = "DDNS_AWS_PROFILE", default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// AWS region
    #[arg(short = 'r', long, env = "DDNS_AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Use this IPv4 address instead of asking the IP echo service
    #[arg(short = 'i', long, env = "DDNS_IP")]
    pub ip: Option<String>,

    /// IP echo service queried when --ip is not given
    #[arg(long, env = "DDNS_IP_ECHO_URL", default_value = DEFAULT_IP_ECHO_URL)]
    pub ip_echo_url: String,

    /// Log the change batches instead of submitting them
    #[arg(long, env = "DDNS_DRY_RUN")]
    pub dry_run: bool,

    /// Keep going after a domain fails; exit non-zero at the end
    #[arg(long, env = "DDNS_CONTINUE_ON_ERROR")]
    pub continue_on_error: bool,

    /// Only treat a record set as current when it holds exactly the IP
    #[arg(long, env = "DDNS_STRICT_MULTI_VALUE")]
    pub strict_multi_value: bool,

    /// trace, debug, info, warn or error
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info")]
    pub log_level: Level,
}

impl UpdateRecordSetArgs {
    pub fn request(&self) -> ReconcileRequest {
        let request = ReconcileRequest::new(
            self.hosted_zone_id.trim(),
            self.domains
                .iter()
                .map(|d| d.trim())
                .filter(|d| !d.is_empty()),
        )
        .with_record_type(self.record_type)
        .with_ttl(self.ttl);

        match &self.ip {
            Some(ip) => request.with_explicit_ip(ip.trim()),
            None => request,
        }
    }

    pub fn options(&self) -> ReconcileOptions {
        let multi_value = if self.strict_multi_value {
            MultiValuePolicy::RequireSingleton
        } else {
            MultiValuePolicy::LastValueWins
        };
        let failure = if self.continue_on_error {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        };

        ReconcileOptions::default()
            .with_multi_value_policy(multi_value)
            .with_failure_policy(failure)
    }

    pub fn aws_profile(&self) -> AwsProfile {
        AwsProfile::new(&self.profile, &self.region)
    }
}
