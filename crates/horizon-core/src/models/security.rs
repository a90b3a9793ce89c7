//! Security event models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{status_enum_str, Tone};

/// Severity of a security event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecuritySeverity {
    Low,
    Medium,
    High,
    Critical,
}

status_enum_str!(SecuritySeverity, "security severity", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

impl SecuritySeverity {
    pub fn tone(&self) -> Tone {
        match self {
            SecuritySeverity::Low => Tone::Muted,
            SecuritySeverity::Medium => Tone::Caution,
            SecuritySeverity::High => Tone::Warning,
            SecuritySeverity::Critical => Tone::Danger,
        }
    }
}

/// Category of a security event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityEventKind {
    Access,
    Alert,
    Audit,
    Config,
}

status_enum_str!(SecurityEventKind, "security event kind", {
    Access => "access",
    Alert => "alert",
    Audit => "audit",
    Config => "config",
});

impl SecurityEventKind {
    /// Short glyph shown in the event list
    pub fn glyph(&self) -> &'static str {
        match self {
            SecurityEventKind::Access => "USR",
            SecurityEventKind::Alert => "ALR",
            SecurityEventKind::Audit => "AUD",
            SecurityEventKind::Config => "CFG",
        }
    }
}

/// A security event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: SecurityEventKind,
    pub severity: SecuritySeverity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub resolved: bool,
}

impl SecurityEvent {
    /// Unresolved and above low severity
    pub fn is_active_threat(&self) -> bool {
        !self.resolved && self.severity > SecuritySeverity::Low
    }
}

/// Aggregate security posture shown in the view header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityPosture {
    pub score: u8,
    pub active_threats: usize,
}

impl SecurityPosture {
    pub fn evaluate(score: u8, events: &[SecurityEvent]) -> Self {
        Self {
            score,
            active_threats: events.iter().filter(|e| e.is_active_threat()).count(),
        }
    }

    /// "SECURE" when there are no active threats, else "<n> THREATS"
    pub fn label(&self) -> String {
        if self.active_threats == 0 {
            "SECURE".to_string()
        } else {
            format!("{} THREATS", self.active_threats)
        }
    }

    pub fn tone(&self) -> Tone {
        if self.active_threats == 0 {
            Tone::Positive
        } else {
            Tone::Warning
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(severity: SecuritySeverity, resolved: bool) -> SecurityEvent {
        SecurityEvent {
            id: "e".into(),
            timestamp: Utc::now(),
            kind: SecurityEventKind::Alert,
            severity,
            message: "m".into(),
            user: None,
            resolved,
        }
    }

    #[test]
    fn threats_exclude_low_and_resolved() {
        let events = vec![
            event(SecuritySeverity::Low, false),
            event(SecuritySeverity::Medium, false),
            event(SecuritySeverity::High, false),
            event(SecuritySeverity::Critical, true),
        ];
        let posture = SecurityPosture::evaluate(94, &events);
        assert_eq!(posture.active_threats, 2);
        assert_eq!(posture.label(), "2 THREATS");
    }

    #[test]
    fn secure_when_no_threats() {
        let posture = SecurityPosture::evaluate(94, &[event(SecuritySeverity::Low, false)]);
        assert_eq!(posture.label(), "SECURE");
        assert_eq!(posture.tone(), Tone::Positive);
    }

    #[test]
    fn kind_serializes_as_type() {
        let json = serde_json::to_value(event(SecuritySeverity::High, false)).unwrap();
        assert_eq!(json["type"], "alert");
        assert_eq!(json["severity"], "high");
    }
}
