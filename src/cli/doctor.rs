//! Doctor command - check environment

use crate::artifact::ModelArtifact;
use crate::config::{self, AppConfig};
use anyhow::Result;

pub fn run() -> Result<()> {
    println!("🩺 PriceSage Doctor\n");

    let config = AppConfig::load()?;
    let mut all_ok = true;

    // Model artifact must load and pass shape validation
    match ModelArtifact::load(&config.model_path) {
        Ok(artifact) => println!(
            "✓ Model artifact: {} ({} features)",
            config.model_path.display(),
            artifact.feature_count()
        ),
        Err(e) => {
            all_ok = false;
            println!("✗ Model artifact: {} ({})", config.model_path.display(), e);
        }
    }

    // Explanation credentials (optional - BYOK)
    if config.explain.api_key.is_some() {
        let source = config::active_key_var().unwrap_or("config file");
        println!("✓ Explanation credential: {}", source);
        match config.explain.client() {
            Ok(client) => println!(
                "✓ Explanation provider: {} ({})",
                client.provider().name(),
                client.model()
            ),
            Err(e) => {
                all_ok = false;
                println!("✗ Explanation provider: {}", e);
            }
        }
    } else {
        println!("○ Explanation credential: none configured");
        println!("  Set OPENAI_API_KEY, GROK_API_KEY, or XAI_API_KEY for LLM explanations");
        println!("  (anomalous predictions fall back to built-in heuristic text)");
    }

    if all_ok {
        println!("\n✅ All checks passed!");
        Ok(())
    } else {
        anyhow::bail!("environment check failed")
    }
}
