//! App - アプリケーション層
//!
//! ports を組み合わせて 1 サイクル分の処理を実装する。
//!
//! # 主要コンポーネント
//! - **PriceWatchBuilder**: 構築とワイヤリング（起動時検証）
//! - **PriceWatch**: fetch → load → detect → notify/export → persist
//! - **Fetcher**: コード単位の取得と失敗のレコード化
//! - **Notifier**: リトライ付き配送
//! - **RetryPolicy**: 固定間隔リトライ

pub mod builder;
pub mod cycle;
pub mod fetcher;
pub mod message;
pub mod modes;
pub mod notifier;
pub mod retry;

pub use self::builder::{BuildError, PriceWatchBuilder};
pub use self::cycle::{CycleError, CycleReport, CycleSettings, CycleSummary, PriceWatch};
pub use self::fetcher::Fetcher;
pub use self::message::{EXPORT_CAPTION, escape_html, render_failure, render_report};
pub use self::modes::{EmptyDataPolicy, ExportMode, NotifyMode};
pub use self::notifier::{DeliveryOutcome, Notifier};
pub use self::retry::{Exhausted, RetryPolicy};
