//! API server command handler

use crate::artifact::ModelArtifact;
use crate::config::AppConfig;
use crate::server::{self, AppState};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::info;

/// Start the prediction API. Flags override config file and environment.
pub fn run(addr: Option<String>, port: Option<u16>, model: Option<PathBuf>) -> Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(addr) = addr {
        config.addr = addr;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(model) = model {
        config.model_path = model;
    }

    let artifact = ModelArtifact::load(&config.model_path).with_context(|| {
        format!(
            "Failed to load model artifact from {}",
            config.model_path.display()
        )
    })?;
    info!(
        "loaded model artifact from {} ({} features)",
        config.model_path.display(),
        artifact.feature_count()
    );

    let state = AppState::new(artifact, config.explain);
    let rt = Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(server::serve(state, &config.addr, config.port))
}
