//! Ports - 外部システムとの境界
//!
//! 各 trait はベンダー API・ファイル・Telegram などへのインターフェースを提供し、
//! 実装の詳細を隠蔽する。本番実装とテスト用実装は `impls` にある。

pub mod clock;
pub mod exporter;
pub mod notification;
pub mod price_source;
pub mod snapshot_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::exporter::{ExportError, SpreadsheetExporter};
pub use self::notification::{DeliveryError, Document, MessageFormat, NotificationChannel};
pub use self::price_source::{PriceSource, ProductListing, VendorError};
pub use self::snapshot_store::{SnapshotError, SnapshotStore};
