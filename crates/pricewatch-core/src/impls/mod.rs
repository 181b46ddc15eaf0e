//! Impls - ports の実装
//!
//! # 本番用
//! - **TokovoucherClient**: ベンダー価格 API（reqwest）
//! - **JsonFileSnapshotStore**: `data_old.json` 形式のスナップショット
//! - **TelegramChannel**: Telegram Bot API
//! - **XlsxExporter**: xlsx エクスポート
//!
//! # 開発用・テスト用
//! - **LogChannel**: ログに出すだけ（dry-run）
//! - **memory**: InMemory 実装一式

#[cfg(test)]
mod http_stub;
pub mod json_file;
pub mod log_channel;
pub mod memory;
pub mod telegram;
pub mod tokovoucher;
pub mod xlsx;

pub use self::json_file::JsonFileSnapshotStore;
pub use self::log_channel::LogChannel;
pub use self::memory::{
    Delivery, InMemorySnapshotStore, RecordingChannel, ScriptedAnswer, ScriptedPriceSource,
};
pub use self::telegram::TelegramChannel;
pub use self::tokovoucher::TokovoucherClient;
pub use self::xlsx::XlsxExporter;
