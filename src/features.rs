//! Feature engineering for price prediction
//!
//! Raw product fields (plus optional free-text specs) resolve into the fixed
//! numeric features the regression expects. Precedence per feature: explicit
//! structured field, then a value parsed from free text, then a hard default.
//! A missing free-text match is "unspecified", never zero, so structured
//! fields and defaults can still fill the gap.

use crate::models::{PredictRequest, PredictedInput};
use regex::Regex;
use std::sync::OnceLock;

/// Rating used when the request provides none
pub const DEFAULT_RATING: f64 = 4.0;

/// Brand desirability table. Checked top to bottom, first matching needle
/// wins; unknown brands score 0.0.
const BRAND_RULES: &[(&str, f64)] = &[
    ("apple", 1.0),
    ("msi", 0.35),
    ("dell", 0.25),
    ("samsung", 0.25),
    ("lenovo", 0.2),
    ("asus", 0.15),
    ("hp", 0.15),
    ("acer", 0.05),
];

/// CPU tier table. Checked top to bottom, first matching pattern wins.
const CPU_RULES: &[(&str, f64)] = &[
    (r"i9\b", 4.0),
    (r"i7\b", 3.0),
    (r"i5\b", 2.0),
    (r"i3\b", 1.0),
    (r"ryzen\s*9\b", 3.8),
    (r"ryzen\s*7\b", 3.1),
    (r"ryzen\s*5\b", 2.2),
    (r"ryzen\s*3\b", 1.2),
];

static CPU_PATTERNS: OnceLock<Vec<(Regex, f64)>> = OnceLock::new();

fn cpu_patterns() -> &'static [(Regex, f64)] {
    CPU_PATTERNS.get_or_init(|| {
        CPU_RULES
            .iter()
            .map(|(pattern, level)| (Regex::new(pattern).unwrap(), *level))
            .collect()
    })
}

static RAM_PATTERN: OnceLock<Regex> = OnceLock::new();

fn ram_pattern() -> &'static Regex {
    RAM_PATTERN.get_or_init(|| Regex::new(r"(\d{2,3})\s*gb\b").unwrap())
}

static STORAGE_TB_PATTERN: OnceLock<Regex> = OnceLock::new();

fn storage_tb_pattern() -> &'static Regex {
    STORAGE_TB_PATTERN.get_or_init(|| Regex::new(r"(\d{1,4})\s*tb\b").unwrap())
}

static STORAGE_GB_PATTERN: OnceLock<Regex> = OnceLock::new();

fn storage_gb_pattern() -> &'static Regex {
    STORAGE_GB_PATTERN.get_or_init(|| Regex::new(r"(\d{2,4})\s*gb\b").unwrap())
}

static CPU_TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

fn cpu_token_pattern() -> &'static Regex {
    CPU_TOKEN_PATTERN.get_or_init(|| Regex::new(r"(i[3579]|ryzen\s*[3579])\b").unwrap())
}

/// Score brand desirability on a 0.0..=1.0 scale.
///
/// Case-insensitive substring match against the brand table, so
/// "Apple Inc." and "apple" score the same.
pub fn brand_score(brand: &str) -> f64 {
    let b = brand.to_lowercase();
    BRAND_RULES
        .iter()
        .find(|(needle, _)| b.contains(needle))
        .map(|(_, score)| *score)
        .unwrap_or(0.0)
}

/// Map a CPU description to its tier. Unknown CPUs map to 0.0.
pub fn cpu_level(cpu: &str) -> f64 {
    let c = cpu.to_lowercase();
    cpu_patterns()
        .iter()
        .find(|(pattern, _)| pattern.is_match(&c))
        .map(|(_, level)| *level)
        .unwrap_or(0.0)
}

/// Hardware facts recovered from free-form text. `None` means the text said
/// nothing, which is distinct from zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSpecs {
    pub ram_gb: Option<f64>,
    pub storage_gb: Option<f64>,
    pub cpu: Option<String>,
}

/// Scan free-form text like "16GB RAM, 1TB SSD, Intel i7" for specs.
pub fn parse_specs(text: &str) -> ParsedSpecs {
    let s = text.to_lowercase();

    let ram_gb = ram_pattern()
        .captures(&s)
        .and_then(|c| c[1].parse::<f64>().ok());

    // TB capacities win over GB mentions; the first GB token is usually RAM
    let storage_gb = storage_tb_pattern()
        .captures(&s)
        .and_then(|c| c[1].parse::<f64>().ok())
        .map(|v| v * 1024.0)
        .or_else(|| {
            storage_gb_pattern()
                .captures(&s)
                .and_then(|c| c[1].parse::<f64>().ok())
        });

    let cpu = cpu_token_pattern()
        .find(&s)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "));

    ParsedSpecs {
        ram_gb,
        storage_gb,
        cpu,
    }
}

/// Fully resolved inputs for one prediction: the five regression features
/// plus the normalized strings echoed back to the caller.
#[derive(Debug, Clone)]
pub struct ResolvedSpecs {
    pub brand: Option<String>,
    pub cpu: Option<String>,
    pub ram_gb: f64,
    pub storage_gb: f64,
    pub cpu_level: f64,
    pub brand_score: f64,
    pub rating: f64,
}

impl ResolvedSpecs {
    /// Resolve a raw request: structured fields beat parsed text, parsed
    /// text beats defaults.
    pub fn from_request(req: &PredictRequest) -> Self {
        let parsed = req
            .specs_text
            .as_deref()
            .map(parse_specs)
            .unwrap_or_default();

        let cpu = req.cpu.clone().or(parsed.cpu);
        let ram_gb = req.ram_gb.or(parsed.ram_gb).unwrap_or(0.0);
        let storage_gb = req.storage_gb.or(parsed.storage_gb).unwrap_or(0.0);

        let cpu_level = req
            .cpu_level
            .unwrap_or_else(|| cpu.as_deref().map(cpu_level).unwrap_or(0.0));
        let brand_score = req
            .brand_score
            .unwrap_or_else(|| req.brand.as_deref().map(brand_score).unwrap_or(0.0));
        let rating = req.rating.unwrap_or(DEFAULT_RATING);

        Self {
            brand: req.brand.clone(),
            cpu,
            ram_gb,
            storage_gb,
            cpu_level,
            brand_score,
            rating,
        }
    }

    /// Echo form included in every prediction response
    pub fn to_input(&self) -> PredictedInput {
        PredictedInput {
            brand: self.brand.clone(),
            ram_gb: self.ram_gb,
            storage_gb: self.storage_gb,
            cpu: self.cpu.clone(),
            cpu_level: self.cpu_level,
            rating: self.rating,
        }
    }

    /// Value for a feature by artifact name. Names the artifact knows but
    /// this resolver does not contribute 0.
    pub fn feature(&self, name: &str) -> f64 {
        match name {
            "ram_gb" => self.ram_gb,
            "storage_gb" => self.storage_gb,
            "cpu_level" => self.cpu_level,
            "brand_score" => self.brand_score,
            "rating" => self.rating,
            _ => 0.0,
        }
    }
}
