//! xlsx エクスポート（rust_xlsxwriter）
//!
//! 列は `kode`, `nama_produk`, `price` の 3 つ。
//! 数値の価格は数値セル、それ以外（"Error" など）は文字列セル。

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::domain::PriceRecord;
use crate::ports::{Document, ExportError, SpreadsheetExporter};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADERS: [&str; 3] = ["kode", "nama_produk", "price"];

pub struct XlsxExporter {
    file_prefix: String,
    output_dir: Option<PathBuf>,
}

impl XlsxExporter {
    pub fn new(file_prefix: impl Into<String>) -> Self {
        Self {
            file_prefix: file_prefix.into(),
            output_dir: None,
        }
    }

    /// Also keep a copy of every export under `dir`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn file_name(&self, generated_at: DateTime<Utc>) -> String {
        format!(
            "{}_{}.xlsx",
            self.file_prefix,
            generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    fn render(records: &[PriceRecord]) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        let sheet = workbook.add_worksheet();
        sheet.set_name("prices")?;
        for (col, title) in (0u16..).zip(HEADERS) {
            sheet.write_string_with_format(0, col, title, &bold)?;
        }
        for (row, record) in (1u32..).zip(records) {
            sheet.write_string(row, 0, record.code.as_str())?;
            sheet.write_string(row, 1, record.name.as_str())?;
            match record.price.as_f64() {
                Some(value) => sheet.write_number(row, 2, value)?,
                None => sheet.write_string(row, 2, record.price.to_string())?,
            };
        }

        workbook.save_to_buffer()
    }
}

impl SpreadsheetExporter for XlsxExporter {
    fn export(
        &self,
        records: &[PriceRecord],
        generated_at: DateTime<Utc>,
    ) -> Result<Document, ExportError> {
        let bytes = Self::render(records).map_err(|e| ExportError::Generate(e.to_string()))?;
        let file_name = self.file_name(generated_at);

        if let Some(dir) = &self.output_dir {
            std::fs::create_dir_all(dir)?;
            std::fs::write(dir.join(&file_name), &bytes)?;
            tracing::debug!(dir = %dir.display(), file = %file_name, "export written");
        }

        Ok(Document {
            file_name,
            content_type: XLSX_CONTENT_TYPE,
            bytes,
        })
    }
}
