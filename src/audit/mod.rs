//! Negotiation audit hooks.
//!
//! Every child-initiated resize walks a small state machine
//! (`Idle -> Probing -> Granted | Denied | QueryOnly`). Audit sinks receive one
//! record per transition with structured details, so hosts can trace why a
//! request ended the way it did without instrumenting the controller.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Checkpoints of a child resize negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationStage {
    /// The request was accepted for evaluation; speculative state is live.
    Probing,
    /// The container asked its own ancestor for a new size.
    AncestorConsulted,
    /// The request was committed (or would be, for a query).
    Granted,
    /// The request was refused and all speculative state rolled back.
    Denied,
    /// A query-only request was answered and rolled back.
    QueryOnly,
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct NegotiationAuditEvent {
    pub timestamp: SystemTime,
    pub stage: NegotiationStage,
    pub child: String,
    pub details: Vec<(String, Value)>,
}

impl NegotiationAuditEvent {
    fn new(stage: NegotiationStage, child: String) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            child,
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
pub struct NegotiationAuditEventBuilder {
    event: NegotiationAuditEvent,
}

impl NegotiationAuditEventBuilder {
    pub fn new(stage: NegotiationStage, child: impl Into<String>) -> Self {
        Self {
            event: NegotiationAuditEvent::new(stage, child.into()),
        }
    }

    pub fn detail(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> NegotiationAuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait NegotiationAudit: Send + Sync {
    fn record(&self, event: NegotiationAuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullAudit;

impl NegotiationAudit for NullAudit {
    fn record(&self, _event: NegotiationAuditEvent) {}
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct BufferedAudit {
    events: Mutex<Vec<NegotiationAuditEvent>>,
}

impl BufferedAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NegotiationAuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<NegotiationStage> {
        self.events().iter().map(|event| event.stage).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl NegotiationAudit for BufferedAudit {
    fn record(&self, event: NegotiationAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
