//! One-shot prediction command

use crate::ai::{heuristic_explanation, request_explanation};
use crate::artifact::ModelArtifact;
use crate::config::AppConfig;
use crate::features::ResolvedSpecs;
use crate::models::{AnomalyReport, PredictRequest, PredictResponse};
use crate::scoring::{self, PriceEstimate};
use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;
use tracing::debug;

/// Run one prediction over the same path the API serves
pub fn run(
    brand: Option<String>,
    cpu: Option<String>,
    ram_gb: Option<f64>,
    storage_gb: Option<f64>,
    rating: Option<f64>,
    specs_text: Option<String>,
    json: bool,
    model: Option<PathBuf>,
) -> Result<()> {
    let config = AppConfig::load()?;
    let model_path = model.unwrap_or_else(|| config.model_path.clone());
    let artifact = ModelArtifact::load(&model_path).with_context(|| {
        format!(
            "Failed to load model artifact from {}",
            model_path.display()
        )
    })?;

    let req = PredictRequest {
        brand,
        cpu,
        ram_gb,
        storage_gb,
        rating,
        specs_text,
        ..Default::default()
    };
    let specs = ResolvedSpecs::from_request(&req);
    let estimate = scoring::score(&artifact, &specs);

    let explanation = estimate
        .is_anomalous
        .then(|| explain_or_fallback(&config, &specs, &estimate));

    let response = PredictResponse {
        input: specs.to_input(),
        predicted_price: estimate.predicted_price,
        anomaly: AnomalyReport {
            is_anomalous: estimate.is_anomalous,
            bounds: estimate.bounds,
            explanation,
        },
        model: artifact,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_report(&response);
    }
    Ok(())
}

fn explain_or_fallback(
    config: &AppConfig,
    specs: &ResolvedSpecs,
    estimate: &PriceEstimate,
) -> String {
    let attempt = config
        .explain
        .client()
        .and_then(|client| request_explanation(&client, specs, estimate));

    match attempt {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => heuristic_explanation(estimate).to_string(),
        Err(e) => {
            debug!("explanation unavailable ({}), using heuristic", e);
            heuristic_explanation(estimate).to_string()
        }
    }
}

fn print_report(response: &PredictResponse) {
    let input = &response.input;

    println!("🔮 PriceSage\n");
    println!("  Brand:    {}", input.brand.as_deref().unwrap_or("-"));
    println!(
        "  CPU:      {} (level {})",
        input.cpu.as_deref().unwrap_or("-"),
        input.cpu_level
    );
    println!("  RAM:      {} GB", input.ram_gb);
    println!("  Storage:  {} GB", input.storage_gb);
    println!("  Rating:   {}", input.rating);
    println!();
    println!(
        "  Predicted price: {}",
        style(format!("${:.2}", response.predicted_price)).bold()
    );
    println!(
        "  Expected range:  ${:.0} to ${:.0}",
        response.anomaly.bounds.lower, response.anomaly.bounds.upper
    );
    println!();

    if response.anomaly.is_anomalous {
        println!("  {} Anomalous prediction", style("⚠").yellow().bold());
        if let Some(explanation) = &response.anomaly.explanation {
            println!("  {}", explanation);
        }
    } else {
        println!("  {} Within expected range", style("✓").green());
    }
}
