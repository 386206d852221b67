//! CLI command definitions and handlers

mod doctor;
mod model;
mod predict;
mod serve;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PriceSage - Linear-regression price estimation
#[derive(Parser, Debug)]
#[command(name = "pricesage")]
#[command(
    version,
    about = "Estimate consumer product prices from specs and flag anomalous results",
    long_about = "PriceSage estimates product prices with a precomputed linear regression \
model: structured specs (or free text like \"16GB RAM, 1TB SSD, Intel i7\") resolve \
into numeric features, standardize against training-time statistics, and score in \
one dot product. Predictions outside the expected range are flagged and explained.\n\n\
Run without a subcommand to start the API server on 127.0.0.1:8080.",
    after_help = "\
Examples:
  pricesage serve                          Start the API server
  pricesage serve --port 3000              Serve on another port
  pricesage predict --specs \"16GB RAM, 1TB SSD, Intel i7\"
  pricesage predict --brand Apple --ram-gb 64 --json
  pricesage model                          Inspect the model artifact
  pricesage doctor                         Check environment setup

Documentation: https://github.com/price-sage/pricesage"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP prediction API
    #[command(after_help = "\
Examples:
  pricesage serve                                 Bind 127.0.0.1:8080
  pricesage serve --addr 0.0.0.0 --port 3000      Expose on the network
  pricesage serve --model custom/model.json       Serve a different artifact

Endpoints:
  POST /predict       Price prediction with anomaly check
  GET  /sample-data   Products mapped from the public demo catalog
  GET  /health        Liveness and model info")]
    Serve {
        /// Bind address (default: 127.0.0.1)
        #[arg(long, env = "PRICESAGE_ADDR")]
        addr: Option<String>,

        /// Bind port (default: 8080)
        #[arg(long, env = "PRICESAGE_PORT")]
        port: Option<u16>,

        /// Path to the model artifact JSON
        #[arg(long, env = "PRICESAGE_MODEL")]
        model: Option<PathBuf>,
    },

    /// Predict a price from the command line (no server needed)
    #[command(after_help = "\
Examples:
  pricesage predict --specs \"16GB RAM, 1TB SSD, Intel i7\"
  pricesage predict --brand Dell --cpu \"Intel i7\" --ram-gb 16 --storage-gb 512
  pricesage predict --brand Apple --ram-gb 64 --storage-gb 4096 --rating 5
  pricesage predict --specs \"32GB RAM\" --json     JSON output for scripting")]
    Predict {
        /// Product brand (e.g. Dell, Apple)
        #[arg(long)]
        brand: Option<String>,

        /// CPU description (e.g. "Intel i7", "Ryzen 7")
        #[arg(long)]
        cpu: Option<String>,

        /// RAM in GB
        #[arg(long)]
        ram_gb: Option<f64>,

        /// Storage in GB
        #[arg(long)]
        storage_gb: Option<f64>,

        /// Customer rating, 0-5 (default: 4)
        #[arg(long)]
        rating: Option<f64>,

        /// Free-text specs, scanned for RAM, storage, and CPU
        #[arg(long)]
        specs: Option<String>,

        /// Output the full response as JSON
        #[arg(long)]
        json: bool,

        /// Path to the model artifact JSON
        #[arg(long, env = "PRICESAGE_MODEL")]
        model: Option<PathBuf>,
    },

    /// Show the model artifact (features, coefficients, anomaly bounds)
    Model {
        /// Path to the model artifact JSON
        #[arg(long, env = "PRICESAGE_MODEL")]
        model: Option<PathBuf>,
    },

    /// Check environment setup (model artifact, API keys, provider)
    Doctor,

    /// Show version information
    Version,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Serve { addr, port, model }) => serve::run(addr, port, model),

        Some(Commands::Predict {
            brand,
            cpu,
            ram_gb,
            storage_gb,
            rating,
            specs,
            json,
            model,
        }) => predict::run(brand, cpu, ram_gb, storage_gb, rating, specs, json, model),

        Some(Commands::Model { model: path }) => model::run(path),

        Some(Commands::Doctor) => doctor::run(),

        Some(Commands::Version) => {
            println!("pricesage {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        // Default: serve with config/env settings
        None => serve::run(None, None, None),
    }
}
