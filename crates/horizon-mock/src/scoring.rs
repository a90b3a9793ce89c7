//! Rule-based risk scoring for `POST /predict`
//!
//! Each feature contributes a bounded share of a 0-100 score; the score is
//! bucketed with [`RiskLevel::from_score`].

use horizon_core::{Explanation, FeatureSnapshot, PredictionResponse, RiskLevel};

struct Factor {
    name: &'static str,
    contribution: f64,
}

/// Weighted contributions, largest share first
fn factors(features: &FeatureSnapshot) -> Vec<Factor> {
    let share = |value: f64, low: f64, high: f64, weight: f64| {
        ((value - low) / (high - low)).clamp(0.0, 1.0) * weight
    };
    let mut factors = vec![
        Factor {
            name: "vibration_rms",
            contribution: share(features.vibration_rms, 18.0, 50.0, 40.0),
        },
        Factor {
            name: "vibration_kurtosis",
            contribution: share(features.vibration_kurtosis, 3.0, 6.0, 25.0),
        },
        Factor {
            name: "temperature",
            contribution: share(features.temperature, 45.0, 65.0, 20.0),
        },
        Factor {
            name: "time_since_maintenance",
            contribution: share(features.time_since_maintenance, 0.0, 500.0, 15.0),
        },
    ];
    factors.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    factors
}

/// Risk score in [0, 100], rounded to one decimal
pub fn risk_score(features: &FeatureSnapshot) -> f64 {
    let total: f64 = factors(features).iter().map(|f| f.contribution).sum();
    (total.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

fn recommended_action(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Continue normal operation",
        RiskLevel::Medium => "Schedule inspection within 7 days",
        RiskLevel::High => "Schedule maintenance within 48 hours",
        RiskLevel::Critical => "Stop machine and inspect spindle bearings immediately",
    }
}

/// Full prediction response for `machine_id`
pub fn predict(machine_id: &str, features: &FeatureSnapshot) -> PredictionResponse {
    let score = risk_score(features);
    let level = RiskLevel::from_score(score);
    let top: Vec<String> = factors(features)
        .into_iter()
        .filter(|f| f.contribution > 0.0)
        .take(3)
        .map(|f| f.name.to_string())
        .collect();

    let natural_language = if top.is_empty() {
        format!("{} is operating within normal parameters.", machine_id)
    } else {
        format!(
            "{} risk driven mainly by {}.",
            machine_id,
            top.join(", ")
        )
    };

    PredictionResponse {
        risk_level: Some(level.as_str().to_string()),
        risk_score: score,
        recommended_action: recommended_action(level).to_string(),
        explanation: Some(Explanation {
            natural_language: Some(natural_language),
            top_factors: Some(top),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_core::{ConsolePoint, SystemStatus};

    fn snapshot(vibration: f64, status: SystemStatus) -> FeatureSnapshot {
        ConsolePoint {
            time: "t".into(),
            vibration,
            temp: 43.0,
            power: 12.2,
            anomaly: false,
        }
        .feature_snapshot(status)
    }

    #[test]
    fn nominal_console_is_low_risk() {
        let score = risk_score(&snapshot(21.0, SystemStatus::Nominal));
        assert_eq!(RiskLevel::from_score(score), RiskLevel::Low);
    }

    #[test]
    fn anomaly_while_degraded_is_high_risk() {
        let response = predict("CNC-ALPHA-921", &snapshot(70.0, SystemStatus::Degraded));
        let prediction = response.validate().unwrap();
        assert!(prediction.risk_level >= RiskLevel::High);
        assert!(prediction
            .explanation
            .unwrap()
            .contains("vibration_rms"));
    }

    #[test]
    fn score_is_bounded() {
        let mut features = snapshot(500.0, SystemStatus::Degraded);
        features.temperature = 500.0;
        features.time_since_maintenance = 1e6;
        features.vibration_kurtosis = 50.0;
        assert_eq!(risk_score(&features), 100.0);
    }
}
