//! Telegram HTML message rendering.

use std::fmt::{Display, Write};

use crate::domain::ChangeReport;

pub const CHANGES_HEADER: &str = "<b>Perubahan Harga Terdeteksi:</b>\n";
pub const NO_CHANGES_HEADER: &str = "<b>Tidak Ada Perubahan Harga</b>\n";
pub const UNCHANGED_HEADER: &str = "<b>Produk Tanpa Perubahan Harga:</b>\n";

/// Caption attached to the exported spreadsheet.
pub const EXPORT_CAPTION: &str = "File Excel berhasil diekspor dan berisi data terbaru.";

/// Escape the three characters Telegram's HTML parse mode cares about.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn esc(value: impl Display) -> String {
    escape_html(&value.to_string())
}

/// Render a change report.
///
/// With `include_unchanged = false` only the changed block is rendered (the
/// caller is expected to skip sending when there is nothing to say). With
/// `include_unchanged = true` an explicit "no changes" header replaces an
/// empty changed block, followed by the unchanged items.
pub fn render_report(report: &ChangeReport, include_unchanged: bool) -> String {
    let mut out = String::new();

    if report.has_changes() {
        out.push_str(CHANGES_HEADER);
        for item in &report.changed {
            // write! on String cannot fail
            let _ = write!(
                out,
                "- Kode: <b>{}</b>\n  Nama: {}\n  Harga Lama: <s>{}</s>\n  Harga Baru: <b>{}</b>\n\n",
                esc(&item.code),
                esc(&item.name),
                esc(&item.old_price),
                esc(&item.new_price),
            );
        }
    } else if include_unchanged {
        out.push_str(NO_CHANGES_HEADER);
    }

    if include_unchanged && !report.unchanged.is_empty() {
        out.push_str(UNCHANGED_HEADER);
        for item in &report.unchanged {
            let _ = write!(
                out,
                "- Kode: <b>{}</b>\n  Nama: {}\n  Harga: <b>{}</b>\n\n",
                esc(&item.code),
                esc(&item.name),
                esc(&item.price),
            );
        }
    }

    out
}

pub fn render_failure(error: impl Display) -> String {
    format!("Error dalam proses: {}", esc(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Price, PriceChange, ProductCode, UnchangedPrice};
    use pretty_assertions::assert_eq;

    fn report() -> ChangeReport {
        ChangeReport {
            changed: vec![PriceChange {
                code: ProductCode::new("MLA878"),
                name: "878 Diamonds".to_string(),
                old_price: Price::amount(205000),
                new_price: Price::amount(210000),
            }],
            unchanged: vec![UnchangedPrice {
                code: ProductCode::new("MLAWP1"),
                name: "Weekly Pass".to_string(),
                price: Price::amount(27000),
            }],
        }
    }

    #[test]
    fn changes_only() {
        assert_eq!(
            render_report(&report(), false),
            "<b>Perubahan Harga Terdeteksi:</b>\n\
             - Kode: <b>MLA878</b>\n  Nama: 878 Diamonds\n  Harga Lama: <s>205000</s>\n  Harga Baru: <b>210000</b>\n\n"
        );
    }

    #[test]
    fn full_report_lists_unchanged_items() {
        let text = render_report(&report(), true);
        assert!(text.starts_with(CHANGES_HEADER));
        assert!(text.contains(
            "<b>Produk Tanpa Perubahan Harga:</b>\n- Kode: <b>MLAWP1</b>\n  Nama: Weekly Pass\n  Harga: <b>27000</b>\n\n"
        ));
    }

    #[test]
    fn full_report_without_changes_says_so() {
        let mut r = report();
        r.changed.clear();
        let text = render_report(&r, true);
        assert!(text.starts_with(NO_CHANGES_HEADER));
        assert!(text.contains("MLAWP1"));
    }

    #[test]
    fn names_are_escaped() {
        let mut r = report();
        r.changed[0].name = "Pass <VIP> & more".to_string();
        let text = render_report(&r, false);
        assert!(text.contains("Nama: Pass &lt;VIP&gt; &amp; more\n"));
    }

    #[test]
    fn failure_message() {
        assert_eq!(render_failure("disk <full>"), "Error dalam proses: disk &lt;full&gt;");
    }
}
