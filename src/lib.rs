//! PriceSage - linear-regression price estimation
//!
//! Loads a precomputed regression artifact, derives engineered features
//! from structured fields or free-text specs, and scores them into a price
//! prediction with anomaly annotation. Served over HTTP or invoked one-shot
//! from the CLI.

pub mod ai;
pub mod artifact;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod features;
pub mod models;
pub mod scoring;
pub mod server;
