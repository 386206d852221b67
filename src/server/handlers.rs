//! Request handlers
//!
//! Every endpoint resolves to a stable JSON shape. Internal faults map to a
//! generic error body plus a warn log, never to exception detail. The
//! blocking work (scoring is cheap, but explanations and the catalog fetch
//! do sync HTTP) runs on the blocking pool so a slow upstream stalls only
//! its own request.

use super::AppState;
use crate::ai::{heuristic_explanation, request_explanation};
use crate::catalog;
use crate::features::ResolvedSpecs;
use crate::models::{
    AnomalyReport, ErrorBody, PredictRequest, PredictResponse, SampleDataResponse,
};
use crate::scoring::{self, PriceEstimate};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

/// POST /predict
pub async fn predict(State(state): State<AppState>, Json(req): Json<PredictRequest>) -> Response {
    let result = tokio::task::spawn_blocking(move || run_prediction(&state, &req)).await;

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            warn!("prediction task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Prediction failed")),
            )
                .into_response()
        }
    }
}

/// Full prediction flow: resolve features, score, explain when anomalous
fn run_prediction(state: &AppState, req: &PredictRequest) -> PredictResponse {
    let specs = ResolvedSpecs::from_request(req);
    let estimate = scoring::score(&state.model, &specs);

    let explanation = estimate
        .is_anomalous
        .then(|| explain_or_fallback(state, &specs, &estimate));

    PredictResponse {
        input: specs.to_input(),
        predicted_price: estimate.predicted_price,
        anomaly: AnomalyReport {
            is_anomalous: estimate.is_anomalous,
            bounds: estimate.bounds,
            explanation,
        },
        model: (*state.model).clone(),
    }
}

/// Best-effort explanation: any failure downgrades to the heuristic
/// sentence, so nothing here can fail the request.
fn explain_or_fallback(
    state: &AppState,
    specs: &ResolvedSpecs,
    estimate: &PriceEstimate,
) -> String {
    let attempt = state
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

/// GET /sample-data
pub async fn sample_data(State(state): State<AppState>) -> Response {
    let url = state.catalog_url.clone();
    let result = tokio::task::spawn_blocking(move || catalog::fetch_catalog(&url)).await;

    match result {
        Ok(Ok(items)) => {
            let response = SampleDataResponse {
                source: state.catalog_url.clone(),
                count: items.len(),
                items,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(Err(e)) => {
            warn!("sample data fetch failed: {}", e);
            sample_data_error()
        }
        Err(e) => {
            warn!("sample data task failed: {}", e);
            sample_data_error()
        }
    }
}

fn sample_data_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("Failed to fetch sample data")),
    )
        .into_response()
}

/// Health/readiness payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub features: usize,
    pub checked_at: DateTime<Utc>,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        features: state.model.feature_count(),
        checked_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ModelArtifact, ScalerParams, TargetStats};
    use crate::config::ExplainSettings;

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

    /// Prediction is always exactly the intercept (all stds zero)
    fn constant_artifact(intercept: f64) -> ModelArtifact {
        ModelArtifact {
            feature_order: vec!["ram_gb".to_string()],
            scaler: ScalerParams {
                means: vec![0.0],
                stds: vec![0.0],
            },
            coefficients: vec![1000.0],
            intercept,
            y_stats: TargetStats {
                mean: 1000.0,
                std: 100.0,
                min: 300.0,
                max: 2000.0,
            },
        }
    }

    fn state_with(model: ModelArtifact) -> AppState {
        // No API key configured, so explanations always use the heuristic
        AppState::new(model, ExplainSettings::default())
    }

    #[test]
    fn test_run_prediction_in_range() {
        let state = state_with(sample_artifact());
        let req = PredictRequest {
            ram_gb: Some(16.0),
            storage_gb: Some(512.0),
            cpu: Some("Intel i7".to_string()),
            brand: Some("Dell".to_string()),
            rating: Some(4.0),
            ..Default::default()
        };

        let response = run_prediction(&state, &req);
        assert!(!response.anomaly.is_anomalous);
        assert!(response.anomaly.explanation.is_none());
        assert_eq!(response.input.cpu.as_deref(), Some("Intel i7"));
        assert_eq!(response.input.brand.as_deref(), Some("Dell"));
        assert_eq!(response.input.cpu_level, 3.0);
        assert_eq!(response.model.feature_order.len(), 5);
        assert!(response.predicted_price >= scoring::PRICE_FLOOR);
    }

    #[test]
    fn test_run_prediction_anomalous_falls_back_to_heuristic() {
        // Way above the expected range; no credential means heuristic text
        let state = state_with(constant_artifact(9000.0));
        let response = run_prediction(&state, &PredictRequest::default());

        assert!(response.anomaly.is_anomalous);
        let explanation = response.anomaly.explanation.unwrap();
        assert!(explanation.starts_with("High predicted price"));
    }

    #[test]
    fn test_run_prediction_below_range_heuristic() {
        let state = state_with(constant_artifact(60.0));
        let response = run_prediction(&state, &PredictRequest::default());

        assert!(response.anomaly.is_anomalous);
        let explanation = response.anomaly.explanation.unwrap();
        assert!(explanation.starts_with("Low predicted price"));
    }

    #[test]
    fn test_run_prediction_echoes_parsed_cpu() {
        let state = state_with(sample_artifact());
        let req = PredictRequest {
            specs_text: Some("16GB RAM, 1TB SSD, Intel i7".to_string()),
            ..Default::default()
        };

        let response = run_prediction(&state, &req);
        assert_eq!(response.input.cpu.as_deref(), Some("i7"));
        assert_eq!(response.input.ram_gb, 16.0);
        assert_eq!(response.input.storage_gb, 1024.0);
        assert!(response.input.brand.is_none());
    }
}
