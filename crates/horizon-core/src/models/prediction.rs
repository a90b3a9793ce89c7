//! Risk prediction request/response models (`POST /predict`)

use serde::{Deserialize, Serialize};

use super::{status_enum_str, Tone};
use crate::error::ValidationError;

/// Message shown when the prediction service returns an unusable body
pub const INVALID_PREDICTION_MESSAGE: &str = "Invalid response from AI module";

/// Feature snapshot for one machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub vibration_rms: f64,
    pub vibration_peak: f64,
    pub vibration_kurtosis: f64,
    pub temperature: f64,
    pub temp_rate_of_change: f64,
    pub power_consumption: f64,
    /// Deviation from nominal power, in percent
    pub power_deviation: f64,
    /// Hours since last maintenance
    pub time_since_maintenance: f64,
    pub cumulative_cycles: u64,
}

/// `POST /predict` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub machine_id: String,
    pub features: FeatureSnapshot,
}

/// Risk bucket returned by the prediction service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

status_enum_str!(RiskLevel, "risk level", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

impl RiskLevel {
    pub fn tone(&self) -> Tone {
        match self {
            RiskLevel::Low => Tone::Positive,
            RiskLevel::Medium => Tone::Caution,
            RiskLevel::High => Tone::Warning,
            RiskLevel::Critical => Tone::Danger,
        }
    }

    /// Bucket a 0-100 risk score
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => RiskLevel::Critical,
            s if s >= 60.0 => RiskLevel::High,
            s if s >= 30.0 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

/// Optional explanation block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_factors: Option<Vec<String>>,
}

/// Raw `POST /predict` response body
///
/// Fields are loose on purpose; [`PredictionResponse::validate`] turns it
/// into a [`Prediction`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub recommended_action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

impl PredictionResponse {
    pub fn validate(self) -> Result<Prediction, ValidationError> {
        let level = self
            .risk_level
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ValidationError::Invalid(INVALID_PREDICTION_MESSAGE.to_string()))?
            .parse::<RiskLevel>()
            .map_err(|_| ValidationError::Invalid(INVALID_PREDICTION_MESSAGE.to_string()))?;

        Ok(Prediction {
            risk_level: level,
            risk_score: self.risk_score,
            recommended_action: self.recommended_action,
            explanation: self.explanation.and_then(|e| e.natural_language),
        })
    }
}

/// A validated prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub recommended_action: String,
    pub explanation: Option<String>,
}

impl Prediction {
    /// One-line insight: `Risk Level: HIGH (72%). <explanation or action>`
    pub fn insight(&self) -> String {
        let detail = self
            .explanation
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.recommended_action);
        format!(
            "Risk Level: {} ({}%). {}",
            self.risk_level.as_str().to_uppercase(),
            self.risk_score,
            detail
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_risk_level_is_invalid() {
        let response: PredictionResponse =
            serde_json::from_str(r#"{"risk_score": 12, "recommended_action": "none"}"#).unwrap();
        let err = response.validate().unwrap_err();
        assert_eq!(err.to_string(), INVALID_PREDICTION_MESSAGE);
    }

    #[test]
    fn insight_prefers_explanation() {
        let response: PredictionResponse = serde_json::from_str(
            r#"{"risk_level":"high","risk_score":72,"recommended_action":"Schedule maintenance",
                "explanation":{"natural_language":"Bearing wear likely"}}"#,
        )
        .unwrap();
        let prediction = response.validate().unwrap();
        assert_eq!(
            prediction.insight(),
            "Risk Level: HIGH (72%). Bearing wear likely"
        );
    }

    #[test]
    fn insight_falls_back_to_action() {
        let prediction = PredictionResponse {
            risk_level: Some("low".into()),
            risk_score: 8.5,
            recommended_action: "Continue operation".into(),
            explanation: None,
        }
        .validate()
        .unwrap();
        assert_eq!(prediction.insight(), "Risk Level: LOW (8.5%). Continue operation");
    }

    #[test]
    fn score_buckets() {
        assert_eq!(RiskLevel::from_score(10.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(45.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(65.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(99.0), RiskLevel::Critical);
    }
}
