//! Linear scoring against the model artifact
//!
//! Pure functions: standardize each feature with the training-time scaler,
//! apply the learned coefficients, clamp to the price floor, and compare the
//! result against anomaly bounds derived from the target distribution. No
//! randomness, no global state.

use crate::artifact::{ModelArtifact, TargetStats};
use crate::features::ResolvedSpecs;
use serde::{Deserialize, Serialize};

/// Predictions never drop below this, whatever the inputs
pub const PRICE_FLOOR: f64 = 50.0;

/// Multiplier on the target std when widening bounds past min/max
const BOUND_MARGIN: f64 = 1.5;

/// Standardize one value with training-time statistics.
///
/// A zero std yields 0.0 so constant features contribute nothing instead of
/// producing NaN or infinity.
pub fn standardize(value: f64, mean: f64, std: f64) -> f64 {
    if std == 0.0 {
        0.0
    } else {
        (value - mean) / std
    }
}

/// Interval of plausible prices derived from the training targets.
/// Boundary values count as inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyBounds {
    pub lower: f64,
    pub upper: f64,
}

impl AnomalyBounds {
    pub fn from_target_stats(stats: &TargetStats) -> Self {
        Self {
            lower: stats.min - BOUND_MARGIN * stats.std,
            upper: stats.max + BOUND_MARGIN * stats.std,
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.lower && price <= self.upper
    }
}

/// One scored prediction
#[derive(Debug, Clone, Copy)]
pub struct PriceEstimate {
    pub predicted_price: f64,
    pub bounds: AnomalyBounds,
    pub is_anomalous: bool,
}

impl PriceEstimate {
    /// Whether the anomaly sits above the expected range
    pub fn above_range(&self) -> bool {
        self.predicted_price > self.bounds.upper
    }
}

/// Score resolved specs against the artifact.
///
/// Relies on the artifact's validated shape: every parameter vector lines up
/// with `feature_order`.
pub fn score(model: &ModelArtifact, specs: &ResolvedSpecs) -> PriceEstimate {
    let mut sum = model.intercept;
    for (i, name) in model.feature_order.iter().enumerate() {
        let x = standardize(
            specs.feature(name),
            model.scaler.means[i],
            model.scaler.stds[i],
        );
        sum += x * model.coefficients[i];
    }

    let predicted_price = sum.max(PRICE_FLOOR);
    let bounds = AnomalyBounds::from_target_stats(&model.y_stats);

    PriceEstimate {
        predicted_price,
        bounds,
        is_anomalous: !bounds.contains(predicted_price),
    }
}
