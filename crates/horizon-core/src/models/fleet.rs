//! Fleet health models

use serde::{Deserialize, Serialize};

use super::{status_enum_str, Tone};

/// Machine health tier reported by the fleet service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTier {
    Optimal,
    Good,
    Moderate,
    Degraded,
    Critical,
}

status_enum_str!(HealthTier, "health tier", {
    Optimal => "optimal",
    Good => "good",
    Moderate => "moderate",
    Degraded => "degraded",
    Critical => "critical",
});

impl HealthTier {
    pub fn tone(&self) -> Tone {
        match self {
            HealthTier::Optimal | HealthTier::Good => Tone::Positive,
            HealthTier::Moderate => Tone::Caution,
            HealthTier::Degraded => Tone::Warning,
            HealthTier::Critical => Tone::Danger,
        }
    }

    /// Tier for a 0-100 health score
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => HealthTier::Optimal,
            s if s >= 75.0 => HealthTier::Good,
            s if s >= 60.0 => HealthTier::Moderate,
            s if s >= 40.0 => HealthTier::Degraded,
            _ => HealthTier::Critical,
        }
    }
}

/// Health of a single machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineStatus {
    pub machine_id: String,
    pub health_score: f64,
    pub status: HealthTier,
    pub location: String,
    #[serde(default)]
    pub last_alert: Option<String>,
}

/// Fleet-wide counts per tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total_machines: u32,
    pub optimal: u32,
    pub good: u32,
    pub moderate: u32,
    pub degraded: u32,
    pub critical: u32,
    pub average_health: f64,
}

impl FleetSummary {
    /// Summarise a set of machines
    pub fn from_machines(machines: &[MachineStatus]) -> Self {
        let mut summary = FleetSummary {
            total_machines: machines.len() as u32,
            ..Default::default()
        };
        for machine in machines {
            match machine.status {
                HealthTier::Optimal => summary.optimal += 1,
                HealthTier::Good => summary.good += 1,
                HealthTier::Moderate => summary.moderate += 1,
                HealthTier::Degraded => summary.degraded += 1,
                HealthTier::Critical => summary.critical += 1,
            }
        }
        if !machines.is_empty() {
            let total: f64 = machines.iter().map(|m| m.health_score).sum();
            summary.average_health = total / machines.len() as f64;
        }
        summary
    }

    pub fn count(&self, tier: HealthTier) -> u32 {
        match tier {
            HealthTier::Optimal => self.optimal,
            HealthTier::Good => self.good,
            HealthTier::Moderate => self.moderate,
            HealthTier::Degraded => self.degraded,
            HealthTier::Critical => self.critical,
        }
    }
}

/// `GET /health/fleet` response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetHealth {
    #[serde(default)]
    pub machines: Vec<MachineStatus>,
    pub summary: FleetSummary,
}

impl FleetHealth {
    pub fn machine(&self, machine_id: &str) -> Option<&MachineStatus> {
        self.machines.iter().find(|m| m.machine_id == machine_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(id: &str, score: f64) -> MachineStatus {
        MachineStatus {
            machine_id: id.into(),
            health_score: score,
            status: HealthTier::from_score(score),
            location: "Bay 1".into(),
            last_alert: None,
        }
    }

    #[test]
    fn tier_from_score() {
        assert_eq!(HealthTier::from_score(95.0), HealthTier::Optimal);
        assert_eq!(HealthTier::from_score(80.0), HealthTier::Good);
        assert_eq!(HealthTier::from_score(65.0), HealthTier::Moderate);
        assert_eq!(HealthTier::from_score(45.0), HealthTier::Degraded);
        assert_eq!(HealthTier::from_score(10.0), HealthTier::Critical);
    }

    #[test]
    fn summary_counts_tiers() {
        let machines = vec![machine("a", 95.0), machine("b", 92.0), machine("c", 30.0)];
        let summary = FleetSummary::from_machines(&machines);
        assert_eq!(summary.total_machines, 3);
        assert_eq!(summary.count(HealthTier::Optimal), 2);
        assert_eq!(summary.count(HealthTier::Critical), 1);
        assert!((summary.average_health - 72.333).abs() < 0.01);
    }

    #[test]
    fn unknown_tier_is_rejected() {
        let body = r#"{"machine_id":"x","health_score":1,"status":"meltdown","location":"l"}"#;
        assert!(serde_json::from_str::<MachineStatus>(body).is_err());
        assert!("meltdown".parse::<HealthTier>().is_err());
        assert_eq!("Critical".parse::<HealthTier>().unwrap(), HealthTier::Critical);
    }
}
