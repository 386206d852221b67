//! Sample catalog fetch
//!
//! Pulls a small public product catalog so clients have realistic data to
//! throw at the predictor. One bounded attempt via sync ureq; faults come
//! back as a typed error and the HTTP layer maps them to a stable 500 body.

use crate::models::CatalogItem;
use serde_json::Value;
use thiserror::Error;

/// Fixed public catalog endpoint
pub const CATALOG_URL: &str = "https://fakestoreapi.com/products";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    RequestFailed(String),

    #[error("catalog response was not valid JSON: {0}")]
    Parse(String),
}

/// Fetch the catalog and map it to items
pub fn fetch_catalog(url: &str) -> Result<Vec<CatalogItem>, CatalogError> {
    let agent = ureq::config::Config::builder()
        .http_status_as_error(false)
        .timeout_global(Some(std::time::Duration::from_secs(15)))
        .build()
        .new_agent();

    let response = agent
        .get(url)
        .call()
        .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

    let status = response.status().as_u16();
    if status >= 400 {
        return Err(CatalogError::RequestFailed(format!(
            "upstream status {status}"
        )));
    }

    let json: Value = response
        .into_body()
        .read_json()
        .map_err(|e| CatalogError::Parse(e.to_string()))?;

    Ok(map_products(&json))
}

/// Map the upstream payload to catalog items. Accepts both a bare array and
/// a `{"products": [...]}` wrapper.
pub fn map_products(json: &Value) -> Vec<CatalogItem> {
    let items = match json {
        Value::Array(items) => items.as_slice(),
        _ => json
            .get("products")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
    };

    items.iter().map(map_product).collect()
}

fn map_product(product: &Value) -> CatalogItem {
    CatalogItem {
        id: product.get("id").and_then(Value::as_u64).unwrap_or(0),
        title: string_field(product, "title"),
        brand: string_field(product, "category"),
        description: string_field(product, "description"),
        rating: rating_of(product),
        price: product.get("price").and_then(Value::as_f64).unwrap_or(0.0),
    }
}

fn string_field(product: &Value, key: &str) -> String {
    product
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Upstreams disagree on the rating shape: some nest `{rate, count}`,
/// others use a bare number. Anything non-numeric maps to 0.
fn rating_of(product: &Value) -> f64 {
    match product.get("rating") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::Object(o)) => o.get("rate").and_then(Value::as_f64).unwrap_or(0.0),
        _ => 0.0,
    }
}
