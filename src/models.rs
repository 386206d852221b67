//! Wire types for the prediction API
//!
//! These models mirror the JSON contract of the HTTP surface: prediction
//! requests and responses, plus the mapped sample-catalog items.

use crate::artifact::ModelArtifact;
use crate::scoring::AnomalyBounds;
use serde::{Deserialize, Deserializer, Serialize};

/// Accept a JSON number, treat anything else (string, bool, null, missing)
/// as unspecified rather than rejecting the request.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Accept a JSON string, treat anything else as unspecified.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// A prediction request. Every field is optional; missing numerics resolve
/// through free-text parsing and defaults downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ram_gb: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub storage_gb: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cpu: Option<String>,
    /// Pre-derived CPU tier; skips derivation from `cpu` when present
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cpu_level: Option<f64>,
    /// Pre-derived brand score; skips the brand table when present
    #[serde(default, deserialize_with = "lenient_f64")]
    pub brand_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    /// Free text like "16GB RAM, 1TB SSD, Intel i7"
    #[serde(default, rename = "specsText", deserialize_with = "lenient_string")]
    pub specs_text: Option<String>,
}

/// Normalized input echoed back with every prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictedInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub ram_gb: f64,
    pub storage_gb: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    pub cpu_level: f64,
    pub rating: f64,
}

/// Anomaly verdict for one prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub is_anomalous: bool,
    pub bounds: AnomalyBounds,
    /// Present only for anomalous predictions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Full prediction response, model artifact included for transparency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub input: PredictedInput,
    pub predicted_price: f64,
    pub anomaly: AnomalyReport,
    pub model: ModelArtifact,
}

/// One product mapped from the external sample catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    pub title: String,
    pub brand: String,
    pub description: String,
    pub rating: f64,
    pub price: f64,
}

/// Sample-data response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleDataResponse {
    pub source: String,
    pub count: usize,
    pub items: Vec<CatalogItem>,
}

/// Stable error body for failed endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_all_fields_optional() {
        let req: PredictRequest = serde_json::from_str("{}").unwrap();
        assert!(req.brand.is_none());
        assert!(req.ram_gb.is_none());
        assert!(req.specs_text.is_none());
    }

    #[test]
    fn test_request_accepts_camel_case_specs_text() {
        let req: PredictRequest =
            serde_json::from_str(r#"{"specsText": "16GB RAM, 1TB SSD"}"#).unwrap();
        assert_eq!(req.specs_text.as_deref(), Some("16GB RAM, 1TB SSD"));
    }

    #[test]
    fn test_request_tolerates_wrong_types() {
        // A string rating or numeric brand must not reject the request
        let req: PredictRequest =
            serde_json::from_str(r#"{"rating": "five stars", "brand": 42, "ram_gb": 16}"#)
                .unwrap();
        assert!(req.rating.is_none());
        assert!(req.brand.is_none());
        assert_eq!(req.ram_gb, Some(16.0));
    }

    #[test]
    fn test_request_integer_numerics() {
        let req: PredictRequest =
            serde_json::from_str(r#"{"ram_gb": 32, "rating": 4}"#).unwrap();
        assert_eq!(req.ram_gb, Some(32.0));
        assert_eq!(req.rating, Some(4.0));
    }

    #[test]
    fn test_input_echo_drops_missing_strings() {
        let input = PredictedInput {
            brand: None,
            ram_gb: 16.0,
            storage_gb: 512.0,
            cpu: None,
            cpu_level: 3.0,
            rating: 4.0,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("brand").is_none());
        assert!(json.get("cpu").is_none());
        assert_eq!(json["ram_gb"], 16.0);
    }

    #[test]
    fn test_anomaly_report_omits_absent_explanation() {
        let report = AnomalyReport {
            is_anomalous: false,
            bounds: AnomalyBounds {
                lower: 100.0,
                upper: 3000.0,
            },
            explanation: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("explanation").is_none());
        assert_eq!(json["bounds"]["lower"], 100.0);
    }
}
