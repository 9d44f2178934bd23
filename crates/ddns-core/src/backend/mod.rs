// # Backend Implementations
//
// Implementations of the DnsBackend trait that live in the core crate.
// Provider-backed implementations ship as their own crates.

pub mod memory;

pub use memory::MemoryBackend;
