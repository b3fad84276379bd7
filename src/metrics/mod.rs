use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    passes: u64,
    resets: u64,
    placed_passes: u64,
    items_placed: u64,
    applies_skipped: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_reset(&mut self) {
        self.passes = self.passes.saturating_add(1);
        self.resets = self.resets.saturating_add(1);
    }

    pub fn record_placed(&mut self, item_count: usize) {
        self.passes = self.passes.saturating_add(1);
        self.placed_passes = self.placed_passes.saturating_add(1);
        self.items_placed = self.items_placed.saturating_add(item_count as u64);
    }

    pub fn record_apply_skipped(&mut self) {
        self.applies_skipped = self.applies_skipped.saturating_add(1);
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            passes: self.passes,
            resets: self.resets,
            placed_passes: self.placed_passes,
            items_placed: self.items_placed,
            applies_skipped: self.applies_skipped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub passes: u64,
    pub resets: u64,
    pub placed_passes: u64,
    pub items_placed: u64,
    pub applies_skipped: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "layout_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("passes".to_string(), json!(self.passes));
        map.insert("resets".to_string(), json!(self.resets));
        map.insert("placed_passes".to_string(), json!(self.placed_passes));
        map.insert("items_placed".to_string(), json!(self.items_placed));
        map.insert("applies_skipped".to_string(), json!(self.applies_skipped));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_counts_each_pass_once() {
        let mut metrics = LayoutMetrics::new();
        metrics.record_reset();
        metrics.record_placed(12);
        metrics.record_placed(12);
        metrics.record_apply_skipped();

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.passes, 3);
        assert_eq!(snapshot.resets, 1);
        assert_eq!(snapshot.placed_passes, 2);
        assert_eq!(snapshot.items_placed, 24);
        assert_eq!(snapshot.applies_skipped, 1);

        let event = snapshot.to_log_event("masonry::metrics");
        assert_eq!(event.message, "layout_metrics");
        assert_eq!(event.field("uptime_ms"), Some(&json!(1500)));
    }
}
