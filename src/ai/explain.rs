//! Prompt assembly and fallback text for anomaly explanations

use crate::ai::client::ExplanationClient;
use crate::ai::ExplainResult;
use crate::features::ResolvedSpecs;
use crate::scoring::PriceEstimate;
use serde_json::json;

const SYSTEM_PROMPT: &str =
    "You are an assistant that explains anomalous price predictions for products succinctly.";

/// Build the user prompt for one anomalous prediction
pub fn anomaly_prompt(specs: &ResolvedSpecs, estimate: &PriceEstimate) -> String {
    let mut spec = serde_json::Map::new();
    if let Some(brand) = &specs.brand {
        spec.insert("brand".to_string(), json!(brand));
    }
    spec.insert("cpu".to_string(), json!(specs.cpu.as_deref().unwrap_or("")));
    spec.insert("ram_gb".to_string(), json!(specs.ram_gb));
    spec.insert("storage_gb".to_string(), json!(specs.storage_gb));
    spec.insert("rating".to_string(), json!(specs.rating));

    format!(
        "The following product spec {} produced a predicted price of ${:.2}, \
         which seems anomalous compared to the expected range [{:.0}, {:.0}]. \
         Explain concisely 1-2 sentences why this might happen (e.g., premium \
         branding, supply constraints, currency fluctuations, sparse training \
         data, feature distribution shift).",
        serde_json::Value::Object(spec),
        estimate.predicted_price,
        estimate.bounds.lower,
        estimate.bounds.upper
    )
}

/// Ask the LLM to explain an anomalous estimate. One bounded attempt;
/// callers decide what to do with a failure.
pub fn request_explanation(
    client: &ExplanationClient,
    specs: &ResolvedSpecs,
    estimate: &PriceEstimate,
) -> ExplainResult<String> {
    client.complete(SYSTEM_PROMPT, &anomaly_prompt(specs, estimate))
}

/// Deterministic fallback when no LLM answer is available
pub fn heuristic_explanation(estimate: &PriceEstimate) -> &'static str {
    if estimate.above_range() {
        "High predicted price may reflect premium branding, top-tier CPU/RAM \
         configuration, or limited supply driving up costs."
    } else {
        "Low predicted price could indicate entry-level specs, discounting, \
         refurbished stock, or gaps in the training data for this configuration."
    }
}
