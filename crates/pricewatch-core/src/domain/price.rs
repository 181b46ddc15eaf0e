//! Price value as received from the vendor.
//!
//! The vendor may answer with a number, a string, or nothing at all, and the
//! fetcher injects the `"Error"` / `"N/A"` sentinels itself. We keep the raw
//! value. Numbers compare by value (`100 == 100.0`), labels compare as text,
//! and a number never equals a label: `100` and `"100"` are different prices.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Sentinel used for per-code fetch failures.
pub const ERROR_LABEL: &str = "Error";

/// Sentinel used when a value is absent.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Price {
    /// Numeric price, kept exactly as the JSON number that was received.
    Amount(Number),

    /// Textual price (either vendor supplied or one of the sentinels).
    Label(String),
}

impl Price {
    pub fn amount(n: impl Into<Number>) -> Self {
        Self::Amount(n.into())
    }

    pub fn label(s: impl Into<String>) -> Self {
        Self::Label(s.into())
    }

    pub fn error() -> Self {
        Self::label(ERROR_LABEL)
    }

    pub fn not_available() -> Self {
        Self::label(NOT_AVAILABLE)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Label(s) if s == ERROR_LABEL)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Amount(n) => n.as_f64(),
            Self::Label(_) => None,
        }
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Amount(a), Self::Amount(b)) if a.is_f64() || b.is_f64() => {
                a.as_f64() == b.as_f64()
            }
            (Self::Amount(a), Self::Amount(b)) => a == b,
            (Self::Label(a), Self::Label(b)) => a == b,
            _ => false,
        }
    }
}

/// `null` は「値なし」とみなし、数値・文字列以外はそのまま JSON 表記で保持する。
impl From<Value> for Price {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => Self::Amount(n),
            Value::String(s) => Self::Label(s),
            Value::Null => Self::not_available(),
            other => Self::Label(other.to_string()),
        }
    }
}

impl From<Price> for Value {
    fn from(price: Price) -> Self {
        match price {
            Price::Amount(n) => Value::Number(n),
            Price::Label(s) => Value::String(s),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(n) => n.fmt(f),
            Self::Label(s) => s.fmt(f),
        }
    }
}
