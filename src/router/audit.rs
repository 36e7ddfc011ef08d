//! Router lifecycle audit hooks.
//!
//! Every checkpoint of the routing state machine is reported to a
//! [`RouterAudit`] sink with structured details, so callers can assert on the
//! exact order of key handling and screen transitions.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Distinct checkpoints emitted by `UiRouter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterAuditStage {
    /// A non-rotary key went down and was recorded as held.
    KeyPressed,
    /// A key came up and was cleared.
    KeyReleased,
    /// A rotary-direction key was delivered as an encoder event.
    RotaryForwarded,
    /// A global shortcut consumed the key.
    GlobalShortcut,
    /// `on_hide` ran on the outgoing screen.
    ScreenHidden,
    /// `on_show` ran on the incoming screen.
    ScreenShown,
    /// An engine was resolved by its requested name.
    EngineSelected,
    /// The requested engine was unknown; the default was used.
    EngineFallback,
    /// Persisted session state was applied.
    SessionLoaded,
    /// Session state was captured for persistence.
    SessionSaved,
    /// A frame was drawn by the active screen.
    FrameDrawn,
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct RouterAuditEvent {
    pub timestamp: SystemTime,
    pub stage: RouterAuditStage,
    pub details: Vec<(String, Value)>,
}

impl RouterAuditEvent {
    fn new(stage: RouterAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

/// Builder helper to append fields ergonomically.
pub struct RouterAuditEventBuilder {
    event: RouterAuditEvent,
}

impl RouterAuditEventBuilder {
    pub fn new(stage: RouterAuditStage) -> Self {
        Self {
            event: RouterAuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> RouterAuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait RouterAudit: Send + Sync {
    fn record(&self, event: RouterAuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullRouterAudit;

impl RouterAudit for NullRouterAudit {
    fn record(&self, _event: RouterAuditEvent) {}
}

/// Buffers every event in memory.
#[derive(Debug, Default)]
pub struct RecordingAudit {
    events: Mutex<Vec<RouterAuditEvent>>,
}

impl RecordingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RouterAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<RouterAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.events.lock() {
            guard.clear();
        }
    }
}

impl RouterAudit for RecordingAudit {
    fn record(&self, event: RouterAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
