//! Fetcher - コードごとにベンダーへ問い合わせ、PriceRecord に正規化する
//!
//! # 設計原則
//! - 失敗はコード単位（バッチ全体は失敗しない）
//! - 出力順 = 入力順
//! - 逐次実行（並列化しない）

use std::sync::Arc;

use crate::domain::{PriceRecord, ProductCode};
use crate::ports::PriceSource;

use super::modes::EmptyDataPolicy;

pub struct Fetcher {
    source: Arc<dyn PriceSource>,
    empty_data: EmptyDataPolicy,
}

impl Fetcher {
    pub fn new(source: Arc<dyn PriceSource>, empty_data: EmptyDataPolicy) -> Self {
        Self { source, empty_data }
    }

    /// Never fails: per-code errors become `"Error"` records.
    pub async fn fetch(&self, codes: &[ProductCode]) -> Vec<PriceRecord> {
        let mut records = Vec::with_capacity(codes.len());

        for code in codes {
            match self.source.lookup(code).await {
                Ok(Some(listing)) => {
                    tracing::debug!(%code, name = %listing.name, price = %listing.price, "fetched");
                    records.push(PriceRecord::new(code.clone(), listing.name, listing.price));
                }
                Ok(None) => match self.empty_data {
                    EmptyDataPolicy::Skip => {
                        tracing::warn!(%code, "no data for code, skipping");
                    }
                    EmptyDataPolicy::NotAvailable => {
                        tracing::warn!(%code, "no data for code, recording N/A");
                        records.push(PriceRecord::not_available(code.clone()));
                    }
                },
                Err(e) => {
                    tracing::error!(%code, error = %e, "vendor request failed");
                    records.push(PriceRecord::error(code.clone()));
                }
            }
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Price;
    use crate::impls::{ScriptedAnswer, ScriptedPriceSource};
    use pretty_assertions::assert_eq;

    fn codes(list: &[&str]) -> Vec<ProductCode> {
        list.iter().map(|c| ProductCode::new(*c)).collect()
    }

    fn source() -> Arc<ScriptedPriceSource> {
        Arc::new(
            ScriptedPriceSource::new()
                .listing("A", "Alpha", Price::amount(100))
                .answer("B", ScriptedAnswer::Status(503))
                .answer("C", ScriptedAnswer::Empty)
                .answer("D", ScriptedAnswer::Unreachable)
                .listing("E", "Echo", Price::label("7.500")),
        )
    }

    #[tokio::test]
    async fn failures_are_isolated_per_code_and_order_is_kept() {
        let fetcher = Fetcher::new(source(), EmptyDataPolicy::NotAvailable);
        let records = fetcher.fetch(&codes(&["E", "D", "C", "B", "A"])).await;

        assert_eq!(
            records,
            vec![
                PriceRecord::new(ProductCode::new("E"), "Echo", Price::label("7.500")),
                PriceRecord::error(ProductCode::new("D")),
                PriceRecord::not_available(ProductCode::new("C")),
                PriceRecord::error(ProductCode::new("B")),
                PriceRecord::new(ProductCode::new("A"), "Alpha", Price::amount(100)),
            ]
        );
    }

    #[tokio::test]
    async fn status_503_becomes_error_record() {
        let fetcher = Fetcher::new(source(), EmptyDataPolicy::NotAvailable);
        let records = fetcher.fetch(&codes(&["B"])).await;
        assert_eq!(records[0].name, "Error");
        assert!(records[0].price.is_error());
    }

    #[tokio::test]
    async fn skip_policy_drops_empty_codes() {
        let src = source();
        let fetcher = Fetcher::new(src.clone(), EmptyDataPolicy::Skip);
        let records = fetcher.fetch(&codes(&["A", "C"])).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, ProductCode::new("A"));
        assert_eq!(src.calls(), 2);
    }

    #[tokio::test]
    async fn one_request_per_code() {
        let src = source();
        let fetcher = Fetcher::new(src.clone(), EmptyDataPolicy::NotAvailable);
        fetcher.fetch(&codes(&["A", "A", "B"])).await;
        assert_eq!(src.calls(), 3);
    }
}
