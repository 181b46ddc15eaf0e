//! Snapshot: the last persisted record per product code.
//!
//! Design:
//! - At most one record per code (map key).
//! - Absence of a code means "never observed".
//! - A new snapshot always replaces the previous one wholesale; there is no
//!   merge with older entries.
//! - Reading is lenient: the code comes from the map key, a missing
//!   `nama_produk` reads as `"N/A"`, and an entry without `price` is treated
//!   as never observed.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::code::ProductCode;
use super::price::{NOT_AVAILABLE, Price};
use super::record::PriceRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    records: BTreeMap<ProductCode, PriceRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a fetched batch.
    ///
    /// When a code appears twice, the later record wins.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PriceRecord>,
    {
        let records = records
            .into_iter()
            .map(|r| (r.code.clone(), r))
            .collect();
        Self { records }
    }

    pub fn get(&self, code: &ProductCode) -> Option<&PriceRecord> {
        self.records.get(code)
    }

    pub fn price_of(&self, code: &ProductCode) -> Option<&Price> {
        self.get(code).map(|r| &r.price)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One stored entry as found on disk; every field may be missing.
#[derive(Deserialize)]
struct StoredEntry {
    #[serde(default, rename = "nama_produk")]
    name: Option<String>,

    #[serde(default)]
    price: Option<Price>,
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = BTreeMap::<ProductCode, StoredEntry>::deserialize(deserializer)?;
        let records = entries
            .into_iter()
            .filter_map(|(code, entry)| {
                let price = entry.price?;
                let name = entry.name.unwrap_or_else(|| NOT_AVAILABLE.to_string());
                Some((code.clone(), PriceRecord::new(code, name, price)))
            })
            .collect();
        Ok(Self { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn later_record_wins_for_duplicate_code() {
        let a = ProductCode::new("A");
        let snap = Snapshot::from_records(vec![
            PriceRecord::new(a.clone(), "first", Price::amount(1)),
            PriceRecord::new(a.clone(), "second", Price::amount(2)),
        ]);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.price_of(&a), Some(&Price::amount(2)));
    }

    #[test]
    fn reads_legacy_file_layout() {
        let raw = json!({
            "MLA878": {"kode": "MLA878", "nama_produk": "878 Diamonds", "price": 210000},
            "MLBB716": {"kode": "MLBB716", "nama_produk": "Error", "price": "Error"}
        });
        let snap: Snapshot = serde_json::from_value(raw).unwrap();
        assert_eq!(snap.len(), 2);
        assert!(snap.price_of(&ProductCode::new("MLBB716")).unwrap().is_error());
        assert_eq!(snap.price_of(&ProductCode::new("nope")), None);
    }

    #[test]
    fn partial_entries_are_read_leniently() {
        let raw = json!({
            "A": {"price": 100},
            "B": {"kode": "B", "nama_produk": "Beta"},
            "C": {"kode": "OTHER", "nama_produk": "Gamma", "price": "Error", "extra": 1},
            "D": {"nama_produk": "Delta", "price": null}
        });
        let snap: Snapshot = serde_json::from_value(raw).unwrap();

        let a = snap.get(&ProductCode::new("A")).unwrap();
        assert_eq!(a.name, "N/A");
        assert_eq!(a.price, Price::amount(100));
        assert_eq!(snap.get(&ProductCode::new("B")), None);
        assert_eq!(snap.get(&ProductCode::new("C")).unwrap().code, ProductCode::new("C"));
        assert_eq!(snap.get(&ProductCode::new("D")), None);
        assert_eq!(snap.len(), 2);
    }

    #[test]
    fn non_object_entry_is_rejected() {
        assert!(serde_json::from_str::<Snapshot>(r#"{"A": 100}"#).is_err());
        assert!(serde_json::from_str::<Snapshot>("[]").is_err());
    }

    #[test]
    fn empty_object_is_empty_snapshot() {
        let snap: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(snap.is_empty());
    }
}
