//! SpreadsheetExporter port - 取得結果の表形式エクスポート

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::notification::Document;
use crate::domain::PriceRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("spreadsheet generation failed: {0}")]
    Generate(String),

    #[error("failed to write export to disk: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders a batch as a downloadable file.
///
/// Synchronous: rendering is CPU-only and small (one row per code).
pub trait SpreadsheetExporter: Send + Sync {
    fn export(
        &self,
        records: &[PriceRecord],
        generated_at: DateTime<Utc>,
    ) -> Result<Document, ExportError>;
}
