//! Regression model artifact
//!
//! The artifact is produced offline by a training pipeline and consumed
//! read-only here. Every parameter vector shares the order defined by
//! `feature_order`; that invariant is checked once at load time and scoring
//! relies on it afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a model artifact
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model artifact is inconsistent: {0}")]
    ShapeMismatch(String),
}

/// Standardization parameters captured at training time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
}

/// Distribution of the training target (price, original units)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// A precomputed linear regression: feature order, scaler, coefficients,
/// intercept, and the target statistics anomaly bounds derive from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_order: Vec<String>,
    pub scaler: ScalerParams,
    pub coefficients: Vec<f64>,
    /// In original target units
    pub intercept: f64,
    pub y_stats: TargetStats,
}

impl ModelArtifact {
    /// Load an artifact from a JSON file and validate its shape
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// All parameter vectors must line up with `feature_order`
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.feature_order.len();
        if self.scaler.means.len() != n
            || self.scaler.stds.len() != n
            || self.coefficients.len() != n
        {
            return Err(ModelError::ShapeMismatch(format!(
                "feature_order has {} entries but means/stds/coefficients have {}/{}/{}",
                n,
                self.scaler.means.len(),
                self.scaler.stds.len(),
                self.coefficients.len()
            )));
        }
        Ok(())
    }

    pub fn feature_count(&self) -> usize {
        self.feature_order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_artifact() -> ModelArtifact {
        ModelArtifact {
            feature_order: vec![
                "ram_gb".to_string(),
                "storage_gb".to_string(),
                "cpu_level".to_string(),
                "brand_score".to_string(),
                "rating".to_string(),
            ],
            scaler: ScalerParams {
                means: vec![14.2, 580.5, 2.4, 0.28, 4.1],
                stds: vec![7.8, 402.3, 1.1, 0.27, 0.42],
            },
            coefficients: vec![212.4, 168.9, 243.7, 310.2, 38.5],
            intercept: 800.0,
            y_stats: TargetStats {
                mean: 1148.3,
                std: 447.6,
                min: 299.0,
                max: 2499.0,
            },
        }
    }

    #[test]
    fn test_validate_accepts_consistent_artifact() {
        assert!(sample_artifact().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_shape_mismatch() {
        let mut artifact = sample_artifact();
        artifact.coefficients.pop();
        let err = artifact.validate().unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch(_)));
    }

    #[test]
    fn test_load_roundtrip() {
        let artifact = sample_artifact();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string_pretty(&artifact).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = ModelArtifact::load(file.path()).unwrap();
        assert_eq!(loaded.feature_order, artifact.feature_order);
        assert_eq!(loaded.intercept, artifact.intercept);
        assert_eq!(loaded.y_stats.max, artifact.y_stats.max);
    }

    #[test]
    fn test_load_rejects_truncated_scaler() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = r#"{
            "feature_order": ["ram_gb", "storage_gb"],
            "scaler": {"means": [16.0], "stds": [8.0]},
            "coefficients": [200.0, 150.0],
            "intercept": 800.0,
            "y_stats": {"mean": 1000.0, "std": 400.0, "min": 300.0, "max": 2500.0}
        }"#;
        file.write_all(json.as_bytes()).unwrap();

        let err = ModelArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch(_)));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a model").unwrap();

        let err = ModelArtifact::load(file.path()).unwrap_err();
        assert!(matches!(err, ModelError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = ModelArtifact::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
