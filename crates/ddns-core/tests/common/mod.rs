//! Test doubles and common utilities for reconciliation contract tests
//!
//! The doubles count every call so tests can assert not only on outcomes
//! but on which collaborators were (or were not) contacted.

#![allow(dead_code)]

use ddns_core::backend::MemoryBackend;
use ddns_core::error::{Error, Result};
use ddns_core::traits::{
    ChangeInfo, ChangeRequest, DnsBackend, IpSource, RecordSet, RecordSetQuery,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ZONE: &str = "Z0123456789ABC";

/// An IpSource that returns a fixed response body
pub struct StaticIpSource {
    body: String,
    call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Create a new StaticIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            body: other.body.clone(),
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }

    fn source_name(&self) -> &str {
        "static"
    }
}

/// An IpSource whose transport always fails
pub struct UnreachableIpSource;

#[async_trait::async_trait]
impl IpSource for UnreachableIpSource {
    async fn current(&self) -> Result<String> {
        Err(Error::http("connection refused"))
    }

    fn source_name(&self) -> &str {
        "unreachable"
    }
}

/// A DnsBackend over MemoryBackend that tracks calls and can inject failures
#[derive(Clone)]
pub struct RecordingBackend {
    inner: MemoryBackend,
    list_call_count: Arc<AtomicUsize>,
    change_requests: Arc<Mutex<Vec<ChangeRequest>>>,
    failing_queries: Arc<Mutex<HashSet<String>>>,
    failing_changes: Arc<Mutex<HashSet<String>>>,
}

impl RecordingBackend {
    pub fn new(inner: MemoryBackend) -> Self {
        Self {
            inner,
            list_call_count: Arc::new(AtomicUsize::new(0)),
            change_requests: Arc::new(Mutex::new(Vec::new())),
            failing_queries: Arc::new(Mutex::new(HashSet::new())),
            failing_changes: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn memory(&self) -> &MemoryBackend {
        &self.inner
    }

    /// Make listings starting at `domain` fail
    pub fn fail_queries_for(&self, domain: &str) {
        self.failing_queries.lock().unwrap().insert(domain.to_string());
    }

    /// Make changes touching `domain` fail
    pub fn fail_changes_for(&self, domain: &str) {
        self.failing_changes.lock().unwrap().insert(domain.to_string());
    }

    /// Get the number of times list_record_sets() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times change_record_sets() was called
    pub fn change_call_count(&self) -> usize {
        self.change_requests.lock().unwrap().len()
    }

    /// Get every change request submitted so far
    pub fn change_requests(&self) -> Vec<ChangeRequest> {
        self.change_requests.lock().unwrap().clone()
    }

    /// Record sets named in submitted changes, in submission order
    pub fn changed_record_sets(&self) -> Vec<RecordSet> {
        self.change_requests()
            .into_iter()
            .flat_map(|r| r.batch.changes.into_iter().map(|c| c.record_set))
            .collect()
    }
}

#[async_trait::async_trait]
impl DnsBackend for RecordingBackend {
    async fn list_record_sets(&self, query: &RecordSetQuery) -> Result<Vec<RecordSet>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        if self.failing_queries.lock().unwrap().contains(&query.start_name) {
            return Err(Error::query(format!("Throttling: rate exceeded for {}", query.start_name)));
        }
        self.inner.list_record_sets(query).await
    }

    async fn change_record_sets(&self, request: &ChangeRequest) -> Result<ChangeInfo> {
        self.change_requests.lock().unwrap().push(request.clone());
        let rejected = {
            let failing = self.failing_changes.lock().unwrap();
            request
                .batch
                .changes
                .iter()
                .any(|c| failing.contains(&c.record_set.name))
        };
        if rejected {
            return Err(Error::apply("InvalidChangeBatch: rejected by test"));
        }
        self.inner.change_record_sets(request).await
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

/// Build a backend holding `records` as `(name, type, values)` in ZONE
pub async fn backend_with(records: &[(&str, &str, &[&str])]) -> RecordingBackend {
    let memory = MemoryBackend::new();
    memory.create_zone(ZONE).await;
    for (name, record_type, values) in records {
        memory
            .insert(ZONE, RecordSet::new(*name, *record_type, Some(60), values.iter().copied()))
            .await;
    }
    RecordingBackend::new(memory)
}
