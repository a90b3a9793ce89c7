//! Security Core view

use chrono::{DateTime, Utc};
use horizon_core::synthetic::{seeded_security_events, SECURITY_SCORE};
use horizon_core::{SecurityEvent, SecurityEventKind, SecurityPosture};
use serde::Serialize;

/// Controller for the Security Core page
#[derive(Debug, Clone, Serialize)]
pub struct SecurityView {
    events: Vec<SecurityEvent>,
    posture: SecurityPosture,
}

impl SecurityView {
    /// Load the seeded event feed as of `now`
    pub fn load(now: DateTime<Utc>) -> Self {
        Self::from_events(SECURITY_SCORE, seeded_security_events(now))
    }

    pub fn from_events(score: u8, events: Vec<SecurityEvent>) -> Self {
        let posture = SecurityPosture::evaluate(score, &events);
        Self { events, posture }
    }

    /// Events, newest first
    pub fn events(&self) -> &[SecurityEvent] {
        &self.events
    }

    pub fn events_of_kind(&self, kind: SecurityEventKind) -> Vec<&SecurityEvent> {
        self.events.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn active_threats(&self) -> Vec<&SecurityEvent> {
        self.events.iter().filter(|e| e.is_active_threat()).collect()
    }

    pub fn posture(&self) -> &SecurityPosture {
        &self.posture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_feed_has_two_threats() {
        let view = SecurityView::load(Utc::now());
        assert_eq!(view.events().len(), 6);
        assert_eq!(view.posture().score, 94);
        assert_eq!(view.posture().active_threats, 2);
        assert_eq!(view.active_threats().len(), 2);
        assert_eq!(view.posture().label(), "2 THREATS");
    }

    #[test]
    fn no_events_is_secure() {
        let view = SecurityView::from_events(100, Vec::new());
        assert_eq!(view.posture().label(), "SECURE");
        assert!(view.events_of_kind(SecurityEventKind::Alert).is_empty());
    }
}
