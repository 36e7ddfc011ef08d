use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by the router and the runtime loop.
#[derive(Debug, Default, Clone)]
pub struct RouterMetrics {
    keypresses: u64,
    keyreleases: u64,
    rotary_events: u64,
    global_shortcuts: u64,
    screen_transitions: u64,
    frames: u64,
}

impl RouterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_keypress(&mut self) {
        self.keypresses = self.keypresses.saturating_add(1);
    }

    pub fn record_keyrelease(&mut self) {
        self.keyreleases = self.keyreleases.saturating_add(1);
    }

    pub fn record_rotary(&mut self) {
        self.rotary_events = self.rotary_events.saturating_add(1);
    }

    pub fn record_global_shortcut(&mut self) {
        self.global_shortcuts = self.global_shortcuts.saturating_add(1);
    }

    pub fn record_transition(&mut self) {
        self.screen_transitions = self.screen_transitions.saturating_add(1);
    }

    pub fn record_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            keypresses: self.keypresses,
            keyreleases: self.keyreleases,
            rotary_events: self.rotary_events,
            global_shortcuts: self.global_shortcuts,
            screen_transitions: self.screen_transitions,
            frames: self.frames,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub keypresses: u64,
    pub keyreleases: u64,
    pub rotary_events: u64,
    pub global_shortcuts: u64,
    pub screen_transitions: u64,
    pub frames: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "router_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("keypresses".to_string(), json!(self.keypresses));
        map.insert("keyreleases".to_string(), json!(self.keyreleases));
        map.insert("rotary_events".to_string(), json!(self.rotary_events));
        map.insert("global_shortcuts".to_string(), json!(self.global_shortcuts));
        map.insert(
            "screen_transitions".to_string(),
            json!(self.screen_transitions),
        );
        map.insert("frames".to_string(), json!(self.frames));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = RouterMetrics::new();
        metrics.record_keypress();
        metrics.record_keypress();
        metrics.record_keyrelease();
        metrics.record_transition();

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.uptime_ms, 1500);
        assert_eq!(snapshot.keypresses, 2);
        assert_eq!(snapshot.keyreleases, 1);
        assert_eq!(snapshot.screen_transitions, 1);
        assert_eq!(snapshot.frames, 0);

        let event = snapshot.to_log_event("ui.metrics");
        assert_eq!(event.message, "router_metrics");
        assert_eq!(event.field("keypresses"), Some(&json!(2)));
    }
}
