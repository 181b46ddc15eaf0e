use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// 商品コード（ベンダー側の `kode`）
///
/// システム全体で一意なキー。中身は不透明な文字列として扱い、
/// 大文字小文字の正規化などは行わない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `"A,B, C"` のようなカンマ区切りリストを分解する
    ///
    /// 前後の空白は除去し、空要素は捨てる。
    /// 全要素が空なら空の Vec を返す（呼び出し側で「コード未指定」として扱う）。
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::new)
            .collect()
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for ProductCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ProductCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_trims_and_drops_empty_items() {
        let codes = ProductCode::parse_list(" MLA878, ,MLBB716,");
        assert_eq!(codes, vec![ProductCode::new("MLA878"), ProductCode::new("MLBB716")]);
    }

    #[test]
    fn parse_list_of_empty_string_is_empty() {
        assert!(ProductCode::parse_list("").is_empty());
        assert!(ProductCode::parse_list(" , ").is_empty());
    }

    #[test]
    fn serializes_as_plain_string() {
        let s = serde_json::to_string(&ProductCode::new("MLAWP1")).unwrap();
        assert_eq!(s, "\"MLAWP1\"");
    }
}
