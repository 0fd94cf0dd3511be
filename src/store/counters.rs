//! Namespaced URL hit counters.

use dashmap::DashMap;
use serde::Serialize;

use crate::observability::metrics;

/// Namespace for organic traffic.
pub const NAMESPACE_REAL: &str = "real";

/// Namespace for harness-generated traffic, selected by the
/// `X-Request-Source: test` header. Cleared when the breaker trips.
pub const NAMESPACE_TEST: &str = "test";

/// One row of the stats report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UrlCount {
    pub path: String,
    pub hits: u64,
}

/// In-memory hit counters, keyed by request path within a namespace.
///
/// Shared across handlers and the breaker's cleanup hook; all operations
/// take `&self`.
#[derive(Default)]
pub struct CounterStore {
    real: DashMap<String, u64>,
    test: DashMap<String, u64>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, namespace: &str) -> &DashMap<String, u64> {
        if namespace == NAMESPACE_TEST {
            &self.test
        } else {
            &self.real
        }
    }

    /// Count one hit for `path`, returning the new total.
    pub fn increment(&self, namespace: &str, path: &str) -> u64 {
        metrics::record_hit(namespace);

        let mut entry = self
            .table(namespace)
            .entry(path.to_string())
            .or_insert(0);
        *entry += 1;
        *entry
    }

    /// Drop every counter in `namespace`, returning how many keys were
    /// removed.
    pub fn clear_namespace(&self, namespace: &str) -> usize {
        let table = self.table(namespace);
        let removed = table.len();
        table.clear();
        removed
    }

    /// Ordered report for `namespace`, most requested first. Ties break on
    /// path so the ordering is stable.
    pub fn snapshot(&self, namespace: &str) -> Vec<UrlCount> {
        let mut rows: Vec<UrlCount> = self
            .table(namespace)
            .iter()
            .map(|entry| UrlCount {
                path: entry.key().clone(),
                hits: *entry.value(),
            })
            .collect();

        rows.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.path.cmp(&b.path)));
        rows
    }

    /// Distinct paths tracked across both namespaces.
    pub fn key_count(&self) -> usize {
        self.real.len() + self.test.len()
    }
}
