//! Domain model (codes, prices, records, snapshot, change report).
//!
//! このモジュールは I/O を一切持たない。
//! 外部とのやり取りは `ports` 経由で行う。

pub mod code;
pub mod detect;
pub mod price;
pub mod record;
pub mod report;
pub mod snapshot;
pub mod stage;

pub use self::code::ProductCode;
pub use self::detect::detect;
pub use self::price::{ERROR_LABEL, NOT_AVAILABLE, Price};
pub use self::record::PriceRecord;
pub use self::report::{ChangeReport, PriceChange, UnchangedPrice};
pub use self::snapshot::Snapshot;
pub use self::stage::CycleStage;
