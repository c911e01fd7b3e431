use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Per-session message counters, shared between the reducer and the bridge.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub received: usize,
    pub rendered: usize,
    pub malformed: usize,
    pub missing_coordinates: usize,
}

impl MetricsSnapshot {
    pub fn dropped(&self) -> usize {
        self.malformed + self.missing_coordinates
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_received(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.received += 1;
        }
    }

    pub fn record_rendered(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rendered += 1;
        }
    }

    pub fn record_malformed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.malformed += 1;
        }
    }

    pub fn record_missing_coordinates(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.missing_coordinates += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_counts_both_failure_kinds() {
        let recorder = MetricsRecorder::new();
        recorder.record_received();
        recorder.record_received();
        recorder.record_received();
        recorder.record_malformed();
        recorder.record_missing_coordinates();
        recorder.record_rendered();

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.received, 3);
        assert_eq!(snapshot.rendered, 1);
        assert_eq!(snapshot.dropped(), 2);
    }
}
