// # IP Source Trait
//
// Defines the interface for looking up the public IP address of the network
// this process runs on.
//
// ## Implementations
//
// - HTTP IP-echo service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> ddns_core::Result<()> {
//     let source = /* IpSource implementation */;
//
//     // Raw, unvalidated text as returned by the service
//     let candidate = source.current().await?;
//     println!("service says: {:?}", candidate);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// A source performs exactly one lookup per call and hands back whatever the
/// service returned. It does not trim, parse or validate: that is owned by
/// [`IpResolver`](crate::resolver::IpResolver), so an unvalidated value can
/// never reach the reconciler.
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (a failed lookup fails the run)
/// - ❌ Cache results across calls
/// - ❌ Touch DNS state
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Look up the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The raw response text (may carry whitespace)
    /// - `Err(Error)`: Transport or service failure
    async fn current(&self) -> Result<String, crate::Error>;

    /// Get the source name (for logging)
    fn source_name(&self) -> &str;
}
