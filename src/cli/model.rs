//! Model artifact inspection command

use crate::artifact::ModelArtifact;
use crate::config::AppConfig;
use crate::scoring::AnomalyBounds;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Print the artifact's parameters as a feature table
pub fn run(model: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load()?;
    let model_path = model.unwrap_or(config.model_path);
    let artifact = ModelArtifact::load(&model_path).with_context(|| {
        format!(
            "Failed to load model artifact from {}",
            model_path.display()
        )
    })?;

    println!("📦 Model artifact: {}\n", model_path.display());

    println!(
        "  {:<14} {:>10} {:>10} {:>12}",
        "feature", "mean", "std", "coefficient"
    );
    // Indexing is safe: load() validated that all vectors share a length
    for (i, name) in artifact.feature_order.iter().enumerate() {
        println!(
            "  {:<14} {:>10.2} {:>10.2} {:>12.2}",
            name, artifact.scaler.means[i], artifact.scaler.stds[i], artifact.coefficients[i]
        );
    }

    println!("\n  Intercept: {:.2}", artifact.intercept);
    println!(
        "  Target:    mean={:.2} std={:.2} min={:.2} max={:.2}",
        artifact.y_stats.mean, artifact.y_stats.std, artifact.y_stats.min, artifact.y_stats.max
    );

    let bounds = AnomalyBounds::from_target_stats(&artifact.y_stats);
    println!("  Anomaly bounds: [{:.2}, {:.2}]", bounds.lower, bounds.upper);

    Ok(())
}
