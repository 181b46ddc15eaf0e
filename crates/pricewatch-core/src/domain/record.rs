use serde::{Deserialize, Serialize};

use super::code::ProductCode;
use super::price::{ERROR_LABEL, NOT_AVAILABLE, Price};

/// One product as observed in a single fetch cycle.
///
/// Field names on the wire follow the vendor / legacy snapshot format
/// (`kode`, `nama_produk`, `price`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(rename = "kode")]
    pub code: ProductCode,

    #[serde(rename = "nama_produk")]
    pub name: String,

    pub price: Price,
}

impl PriceRecord {
    pub fn new(code: ProductCode, name: impl Into<String>, price: Price) -> Self {
        Self {
            code,
            name: name.into(),
            price,
        }
    }

    /// Placeholder for a code whose request failed.
    pub fn error(code: ProductCode) -> Self {
        Self::new(code, ERROR_LABEL, Price::error())
    }

    /// Placeholder for a code the vendor answered with no data.
    pub fn not_available(code: ProductCode) -> Self {
        Self::new(code, NOT_AVAILABLE, Price::not_available())
    }
}
