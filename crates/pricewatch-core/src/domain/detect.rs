//! Change detection.
//!
//! Pure function: (fetched batch, previous snapshot) -> ChangeReport.
//! No I/O, no clock, no configuration.

use super::price::Price;
use super::record::PriceRecord;
use super::report::{ChangeReport, PriceChange, UnchangedPrice};
use super::snapshot::Snapshot;

/// Classify every fetched record as changed or unchanged.
///
/// - No prior record, or a prior price that differs: changed.
///   `old_price` is the prior price, or `"N/A"` if there was none.
/// - Otherwise: unchanged.
///
/// Numbers compare by value, so `100` vs `100.0` is not a change. `100` vs
/// `"100"` is a change, and so is `100` vs `"Error"`; `"Error"` vs `"Error"`
/// is not.
pub fn detect(records: &[PriceRecord], previous: &Snapshot) -> ChangeReport {
    let mut report = ChangeReport::default();

    for record in records {
        match previous.price_of(&record.code) {
            Some(old) if *old == record.price => {
                report.unchanged.push(UnchangedPrice {
                    code: record.code.clone(),
                    name: record.name.clone(),
                    price: record.price.clone(),
                });
            }
            old => {
                report.changed.push(PriceChange {
                    code: record.code.clone(),
                    name: record.name.clone(),
                    old_price: old.cloned().unwrap_or_else(Price::not_available),
                    new_price: record.price.clone(),
                });
            }
        }
    }

    report
}
