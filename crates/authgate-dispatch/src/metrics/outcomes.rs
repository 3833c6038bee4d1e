//! Per-outcome counters aggregated across every stream.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use authgate_auth::{OutcomeKind, StreamReport};

/// One atomic counter per [`OutcomeKind`].
#[derive(Debug, Default)]
pub struct OutcomeCounters {
    counts: [AtomicU64; OutcomeKind::ALL.len()],
}

impl OutcomeCounters {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome.
    pub fn record(&self, kind: OutcomeKind) {
        self.counts[kind.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Count every outcome of a finished stream.
    pub fn record_report(&self, report: &StreamReport) {
        for outcome in &report.outcomes {
            self.record(outcome.kind());
        }
    }

    /// Current value of one counter.
    pub fn get(&self, kind: OutcomeKind) -> u64 {
        self.counts[kind.index()].load(Ordering::Relaxed)
    }

    /// Get a snapshot of all counters
    pub fn snapshot(&self) -> OutcomeSnapshot {
        let counts = OutcomeKind::ALL
            .iter()
            .map(|kind| (kind.as_str().to_string(), self.get(*kind)))
            .collect();
        OutcomeSnapshot { counts }
    }
}

/// Serializable counter snapshot, keyed by outcome name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeSnapshot {
    pub counts: BTreeMap<String, u64>,
}

impl OutcomeSnapshot {
    /// Count for one outcome kind.
    pub fn get(&self, kind: OutcomeKind) -> u64 {
        self.counts.get(kind.as_str()).copied().unwrap_or(0)
    }

    /// Sum of all counters.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use authgate_auth::AuthOutcome;
    use authgate_core::types::StreamId;

    use super::*;

    #[test]
    fn test_record_report_counts_each_outcome() {
        let counters = OutcomeCounters::new();
        let report = StreamReport {
            stream_id: StreamId::new("s1"),
            outcomes: vec![
                AuthOutcome::Bound {
                    account: "guest".to_string(),
                },
                AuthOutcome::ListingGranted {
                    account: "guest".to_string(),
                },
                AuthOutcome::ListingGranted {
                    account: "guest".to_string(),
                },
            ],
            final_account: Some("guest".to_string()),
        };

        counters.record_report(&report);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.get(OutcomeKind::Bound), 1);
        assert_eq!(snapshot.get(OutcomeKind::ListingGranted), 2);
        assert_eq!(snapshot.get(OutcomeKind::AccountLocked), 0);
        assert_eq!(snapshot.total(), 3);
        assert_eq!(snapshot.counts.len(), OutcomeKind::ALL.len());
    }

    #[test]
    fn test_snapshot_serializes_as_map() {
        let counters = OutcomeCounters::new();
        counters.record(OutcomeKind::BadCredential);
        let json = serde_json::to_value(counters.snapshot()).expect("serialize");
        assert_eq!(json["bad_credential"], 1);
        assert_eq!(json["bound"], 0);
    }
}
