//! ChangeReport: per-cycle classification of fetched records.

use serde::{Deserialize, Serialize};

use super::code::ProductCode;
use super::price::Price;

/// A code whose price differs from the snapshot (or was never observed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    #[serde(rename = "kode")]
    pub code: ProductCode,

    #[serde(rename = "nama_produk")]
    pub name: String,

    /// Previous price, or `"N/A"` when the code was not in the snapshot.
    #[serde(rename = "price_lama")]
    pub old_price: Price,

    #[serde(rename = "price_baru")]
    pub new_price: Price,
}

/// A code whose price matches the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnchangedPrice {
    #[serde(rename = "kode")]
    pub code: ProductCode,

    #[serde(rename = "nama_produk")]
    pub name: String,

    pub price: Price,
}

/// Both sequences keep the order of the fetched batch.
/// Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub changed: Vec<PriceChange>,
    pub unchanged: Vec<UnchangedPrice>,
}

impl ChangeReport {
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}
