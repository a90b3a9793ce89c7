//! Synthetic data generators
//!
//! Used by the views that have no backing endpoint (console strip, kernel
//! logs, security events) and by the mock backend for per-machine
//! telemetry. All generators take the RNG explicitly so tests can seed it.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::models::{
    ConsoleLogEntry, ConsolePoint, HealthTier, LogEntry, LogLevel, MachineStatus, SecurityEvent,
    SecurityEventKind, SecuritySeverity, TelemetryReading, MACHINES,
};

/// Probability that a console tick is an anomaly
pub const ANOMALY_PROBABILITY: f64 = 0.02;

/// Number of points on the console strip
pub const CONSOLE_POINTS: usize = 40;

/// Console log entries kept, newest first
pub const CONSOLE_LOG_CAPACITY: usize = 15;

/// Security score shown by the security view
pub const SECURITY_SCORE: u8 = 94;

const LOG_SOURCES: &[&str] = &[
    "SYSTEM",
    "ML-ENGINE",
    "SENSOR-GW",
    "API",
    "DATABASE",
    "SCHEDULER",
    "AUTH",
    "CACHE",
];

// info is weighted three times
const LOG_LEVELS: &[LogLevel] = &[
    LogLevel::Debug,
    LogLevel::Info,
    LogLevel::Info,
    LogLevel::Info,
    LogLevel::Warning,
    LogLevel::Error,
];

const LOG_MESSAGES: &[&str] = &[
    "Heartbeat check completed",
    "Feature vector computed for CNC-ALPHA-921",
    "WebSocket connection established",
    "Batch prediction completed for 8 machines",
    "Cache invalidation triggered",
    "Metric export to Prometheus successful",
];

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

/// Initial console strip, labelled `0:00` .. `39:00`
pub fn initial_console_points<R: Rng + ?Sized>(rng: &mut R) -> Vec<ConsolePoint> {
    (0..CONSOLE_POINTS)
        .map(|i| ConsolePoint {
            time: format!("{}:00", i),
            vibration: 18.0 + rng.gen::<f64>() * 4.0,
            temp: 42.0 + rng.gen::<f64>() * 2.0,
            power: 11.0 + rng.gen::<f64>(),
            anomaly: false,
        })
        .collect()
}

/// Next console point after `last`
///
/// Temperature is a random walk from the previous point; vibration jumps
/// to 55-80 on an anomaly.
pub fn next_console_point<R: Rng + ?Sized>(
    rng: &mut R,
    last: Option<&ConsolePoint>,
    time: String,
) -> ConsolePoint {
    let anomaly = rng.gen_bool(ANOMALY_PROBABILITY);
    let vibration = if anomaly {
        55.0 + rng.gen::<f64>() * 25.0
    } else {
        20.0 + rng.gen::<f64>() * 4.0
    };
    let last_temp = last.map_or(43.0, |p| p.temp);

    ConsolePoint {
        time,
        vibration,
        temp: last_temp + (rng.gen::<f64>() - 0.45),
        power: 12.0 + rng.gen::<f64>() * 0.5,
        anomaly,
    }
}

/// Critical console log entry raised for an anomalous point
pub fn anomaly_log(point: &ConsolePoint, now: DateTime<Utc>) -> ConsoleLogEntry {
    ConsoleLogEntry {
        id: Uuid::new_v4().simple().to_string(),
        timestamp: now.format("%H:%M").to_string(),
        level: LogLevel::Critical,
        message: format!(
            "Anomaly: Spindle vibration threshold exceeded ({:.1}Hz)",
            point.vibration
        ),
    }
}

/// The ten entries the kernel log view starts with, newest first
pub fn seeded_kernel_logs(now: DateTime<Utc>) -> Vec<LogEntry> {
    let seed: [(LogLevel, &str, &str); 10] = [
        (LogLevel::Info, "SYSTEM", "Telemetry ingestion pipeline healthy"),
        (LogLevel::Debug, "ML-ENGINE", "Model inference completed in 45ms"),
        (LogLevel::Warning, "SENSOR-GW", "CNC-ALPHA-921: Sensor reading delay detected (>100ms)"),
        (LogLevel::Info, "API", "Health check passed for all endpoints"),
        (LogLevel::Error, "DATABASE", "Connection pool exhausted, scaling up"),
        (LogLevel::Info, "SCHEDULER", "Cron job executed: feature_aggregation"),
        (LogLevel::Critical, "ALERT", "Anomaly detected on CNC-BETA-102, prediction confidence 0.92"),
        (LogLevel::Info, "AUTH", "User session refreshed: operator@horizonops.com"),
        (LogLevel::Debug, "CACHE", "Redis cache hit ratio: 94.2%"),
        (LogLevel::Warning, "RESOURCE", "Memory usage approaching threshold (82%)"),
    ];

    seed.iter()
        .enumerate()
        .map(|(i, (level, source, message))| LogEntry {
            id: (i + 1).to_string(),
            timestamp: now - Duration::seconds(5 * i as i64),
            level: *level,
            source: source.to_string(),
            message: message.to_string(),
            metadata: None,
        })
        .collect()
}

/// A random kernel log entry stamped `now`
pub fn random_log_entry<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> LogEntry {
    LogEntry {
        id: Uuid::new_v4().to_string(),
        timestamp: now,
        level: *pick(rng, LOG_LEVELS),
        source: pick(rng, LOG_SOURCES).to_string(),
        message: pick(rng, LOG_MESSAGES).to_string(),
        metadata: None,
    }
}

/// The six events the security view starts with, newest first
pub fn seeded_security_events(now: DateTime<Utc>) -> Vec<SecurityEvent> {
    let event = |id: &str,
                 minutes_ago: i64,
                 kind: SecurityEventKind,
                 severity: SecuritySeverity,
                 message: &str,
                 user: Option<&str>,
                 resolved: bool| SecurityEvent {
        id: id.to_string(),
        timestamp: now - Duration::minutes(minutes_ago),
        kind,
        severity,
        message: message.to_string(),
        user: user.map(str::to_string),
        resolved,
    };

    vec![
        event("1", 0, SecurityEventKind::Access, SecuritySeverity::Low, "User login: operator@horizonops.com", Some("operator"), true),
        event("2", 5, SecurityEventKind::Audit, SecuritySeverity::Low, "Configuration backup completed", None, true),
        event("3", 10, SecurityEventKind::Alert, SecuritySeverity::Medium, "Multiple failed login attempts detected", Some("unknown"), false),
        event("4", 15, SecurityEventKind::Config, SecuritySeverity::Low, "Firewall rules updated", Some("admin"), true),
        event("5", 20, SecurityEventKind::Access, SecuritySeverity::Low, "API key rotation completed", None, true),
        event("6", 30, SecurityEventKind::Alert, SecuritySeverity::High, "Unusual network traffic pattern detected", None, false),
    ]
}

/// Baseline operating point of a simulated machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineProfile {
    pub vibration_rms: f64,
    pub temperature: f64,
    pub kurtosis: f64,
    pub power: f64,
    /// Hours since last maintenance
    pub maintenance_age: f64,
    pub location: &'static str,
}

/// Profile for a known machine; unknown ids get `None`
///
/// Later machines in the fleet run hotter and rougher so the simulated
/// fleet spans several health tiers.
pub fn machine_profile(machine_id: &str) -> Option<MachineProfile> {
    let index = MACHINES.iter().position(|m| *m == machine_id)?;
    let wear = index as f64;
    let location = match index {
        0 | 1 => "Bay A - Precision Cell",
        2 | 3 => "Bay B - Structures",
        4 | 5 => "Bay C - Milling",
        _ => "Bay D - Turning",
    };
    Some(MachineProfile {
        vibration_rms: 16.0 + wear * 2.5,
        temperature: 40.0 + wear * 2.0,
        kurtosis: 3.0 + wear * 0.2,
        power: 11.5 + wear * 0.15,
        maintenance_age: 120.0 + wear * 60.0,
        location,
    })
}

/// One reading around the machine's profile
pub fn telemetry_reading<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &MachineProfile,
    timestamp: DateTime<Utc>,
) -> TelemetryReading {
    let vibration_rms = profile.vibration_rms + rng.gen_range(-2.0..2.0);
    let vibration_kurtosis = profile.kurtosis + rng.gen_range(-0.3..0.3);
    let temperature = profile.temperature + rng.gen_range(-1.5..1.5);
    let anomaly_flag = vibration_rms > 30.0 || vibration_kurtosis > 4.5 || temperature > 60.0;

    TelemetryReading {
        timestamp: timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        vibration_rms,
        vibration_peak: vibration_rms * rng.gen_range(1.4..1.8),
        vibration_kurtosis,
        temperature,
        power_consumption: profile.power + rng.gen_range(-0.3..0.3),
        anomaly_flag,
    }
}

/// `count` readings one second apart, oldest first, ending at `now`
pub fn telemetry_history<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &MachineProfile,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<TelemetryReading> {
    (0..count)
        .rev()
        .map(|back| telemetry_reading(rng, profile, now - Duration::seconds(back as i64)))
        .collect()
}

/// Health of one machine, scored from its profile
pub fn machine_status<R: Rng + ?Sized>(
    rng: &mut R,
    machine_id: &str,
    profile: &MachineProfile,
) -> MachineStatus {
    let vibration_penalty = (profile.vibration_rms - 15.0).max(0.0) * 1.5;
    let kurtosis_penalty = (profile.kurtosis - 3.0).max(0.0) * 10.0;
    let temperature_penalty = (profile.temperature - 40.0).max(0.0) * 0.8;
    let health_score = (100.0 - vibration_penalty - kurtosis_penalty - temperature_penalty
        + rng.gen_range(-2.0..2.0))
    .clamp(0.0, 100.0);
    let status = HealthTier::from_score(health_score);
    let last_alert = match status {
        HealthTier::Degraded | HealthTier::Critical => {
            Some(format!("{}: vibration above warning threshold", machine_id))
        }
        _ => None,
    };

    MachineStatus {
        machine_id: machine_id.to_string(),
        health_score,
        status,
        location: profile.location.to_string(),
        last_alert,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SecurityPosture;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn console_points_stay_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = initial_console_points(&mut rng);
        assert_eq!(points.len(), CONSOLE_POINTS);
        assert_eq!(points[3].time, "3:00");
        assert!(points.iter().all(|p| (18.0..22.0).contains(&p.vibration)));

        let mut last = points.last().cloned();
        for _ in 0..500 {
            let next = next_console_point(&mut rng, last.as_ref(), "t".into());
            if next.anomaly {
                assert!((55.0..80.0).contains(&next.vibration));
            } else {
                assert!((20.0..24.0).contains(&next.vibration));
            }
            assert!((12.0..12.5).contains(&next.power));
            last = Some(next);
        }
    }

    #[test]
    fn anomaly_log_formats_vibration() {
        let point = ConsolePoint {
            time: "t".into(),
            vibration: 61.234,
            temp: 43.0,
            power: 12.1,
            anomaly: true,
        };
        let entry = anomaly_log(&point, Utc::now());
        assert_eq!(entry.level, LogLevel::Critical);
        assert_eq!(
            entry.message,
            "Anomaly: Spindle vibration threshold exceeded (61.2Hz)"
        );
    }

    #[test]
    fn seeded_logs_are_newest_first() {
        let now = Utc::now();
        let logs = seeded_kernel_logs(now);
        assert_eq!(logs.len(), 10);
        assert_eq!(logs[0].timestamp, now);
        assert!(logs.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
        assert_eq!(logs[6].level, LogLevel::Critical);
    }

    #[test]
    fn random_log_uses_catalogue() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let entry = random_log_entry(&mut rng, Utc::now());
            assert!(LOG_SOURCES.contains(&entry.source.as_str()));
            assert!(entry.level != LogLevel::Critical);
        }
    }

    #[test]
    fn seeded_security_has_two_threats() {
        let events = seeded_security_events(Utc::now());
        assert_eq!(events.len(), 6);
        let posture = SecurityPosture::evaluate(SECURITY_SCORE, &events);
        assert_eq!(posture.active_threats, 2);
        assert_eq!(posture.label(), "2 THREATS");
    }

    #[test]
    fn profiles_only_for_known_machines() {
        assert!(machine_profile("CNC-ALPHA-921").is_some());
        assert!(machine_profile("CNC-OMEGA-000").is_none());
    }

    #[test]
    fn history_is_oldest_first() {
        let mut rng = StdRng::seed_from_u64(3);
        let profile = machine_profile("MILL-GAMMA-301").unwrap();
        let now = Utc::now();
        let history = telemetry_history(&mut rng, &profile, 5, now);
        assert_eq!(history.len(), 5);
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn fleet_spans_tiers() {
        let mut rng = StdRng::seed_from_u64(9);
        let tiers: std::collections::HashSet<_> = MACHINES
            .iter()
            .map(|id| machine_status(&mut rng, id, &machine_profile(id).unwrap()).status)
            .collect();
        assert!(tiers.len() >= 2);
    }
}
