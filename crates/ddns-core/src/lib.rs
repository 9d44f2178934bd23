// # ddns-core
//
// Core library for the Route53 dynamic DNS updater.
//
// ## Architecture Overview
//
// One invocation performs a single reconciliation pass:
// - **IpSource**: Trait for looking up the public IP of the current network
// - **IpResolver**: Turns an explicit override or an IpSource lookup into a validated IPv4 address
// - **DnsBackend**: Trait for listing and upserting record sets in a hosted zone
// - **Reconciler**: Classifies each domain as no-op or upsert and applies upserts
//
// ## Design Principles
//
// 1. **Library-First**: The CLI is a thin layer over `update_record_sets`
// 2. **Explicit State**: The resolved IP is a value passed into the reconciler, never a shared field
// 3. **Idempotency**: A write is only issued when the published value differs
// 4. **No Hidden Retries**: Every failure propagates to the caller

pub mod traits;
pub mod resolver;
pub mod engine;
pub mod backend;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpSource, DnsBackend};
pub use resolver::{IpResolver, ResolvedIp, is_valid_ipv4};
pub use engine::{Reconciler, ReconcileAction, ReconcileReport, DomainOutcome, update_record_sets};
pub use backend::MemoryBackend;
pub use config::{ReconcileRequest, ReconcileOptions, RecordType, MultiValuePolicy, FailurePolicy};
pub use error::{Error, Result};
