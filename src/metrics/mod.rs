use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters describing how much work a container has done.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LayoutMetrics {
    layout_passes: u64,
    track_recomputes: u64,
    max_updates: u64,
    ancestor_requests: u64,
    granted: u64,
    denied: u64,
    query_only: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_layout_pass(&mut self) {
        self.layout_passes = self.layout_passes.saturating_add(1);
    }

    pub fn record_track_recompute(&mut self) {
        self.track_recomputes = self.track_recomputes.saturating_add(1);
    }

    pub fn record_max_update(&mut self) {
        self.max_updates = self.max_updates.saturating_add(1);
    }

    pub fn record_ancestor_request(&mut self) {
        self.ancestor_requests = self.ancestor_requests.saturating_add(1);
    }

    pub fn record_granted(&mut self) {
        self.granted = self.granted.saturating_add(1);
    }

    pub fn record_denied(&mut self) {
        self.denied = self.denied.saturating_add(1);
    }

    pub fn record_query_only(&mut self) {
        self.query_only = self.query_only.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            layout_passes: self.layout_passes,
            track_recomputes: self.track_recomputes,
            max_updates: self.max_updates,
            ancestor_requests: self.ancestor_requests,
            granted: self.granted,
            denied: self.denied,
            query_only: self.query_only,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub layout_passes: u64,
    pub track_recomputes: u64,
    pub max_updates: u64,
    pub ancestor_requests: u64,
    pub granted: u64,
    pub denied: u64,
    pub query_only: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "layout_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("layout_passes".to_string(), json!(self.layout_passes));
        map.insert("track_recomputes".to_string(), json!(self.track_recomputes));
        map.insert("max_updates".to_string(), json!(self.max_updates));
        map.insert(
            "ancestor_requests".to_string(),
            json!(self.ancestor_requests),
        );
        map.insert("granted".to_string(), json!(self.granted));
        map.insert("denied".to_string(), json!(self.denied));
        map.insert("query_only".to_string(), json!(self.query_only));
        map
    }
}
