use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::barcode::Barcode;
use crate::nutrients::Nutriments;

pub const UNKNOWN_PRODUCT: &str = "Unknown product";

/// Body of `GET /api/v2/product/{barcode}.json`.
#[derive(Debug, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default)]
    pub status_verbose: Option<String>,
    #[serde(default)]
    pub product: Option<RawProduct>,
}

impl LookupResponse {
    pub fn is_found(&self) -> bool {
        self.status.as_ref().and_then(|s| s.as_i64()) == Some(1)
    }
}

#[derive(Debug, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub brands: Option<String>,
    // values are mostly numbers, but units and labels ride along as strings
    #[serde(default)]
    pub nutriments: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub nutriments: Nutriments,
}

impl ProductRecord {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(UNKNOWN_PRODUCT)
    }
}

impl From<RawProduct> for ProductRecord {
    fn from(raw: RawProduct) -> Self {
        let nutriments = raw
            .nutriments
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(k, v)| v.as_f64().map(|n| (k, n)))
            .collect();
        Self {
            name: raw.product_name,
            brand: raw.brands,
            nutriments,
        }
    }
}

/// A record together with the code it was looked up by.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProduct {
    pub barcode: Barcode,
    pub record: ProductRecord,
}
