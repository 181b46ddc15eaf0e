//! PriceSource port - ベンダーの価格 API
//!
//! 1 コード = 1 リクエスト。
//! 失敗の「ダウングレード」（Error レコードへの変換）は app::fetcher の責務で、
//! ここではありのままの結果を返す。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Price, ProductCode};

/// First element of the vendor's `data` array, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListing {
    pub name: String,
    pub price: Price,
}

#[derive(Debug, Error)]
pub enum VendorError {
    /// Transport failure (DNS, TLS, connection reset, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// Anything other than HTTP 200.
    #[error("unexpected status {status}")]
    Status { status: u16 },

    /// 200 but the body was not the JSON we expect.
    #[error("undecodable response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for VendorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Look up one code.
    ///
    /// - `Ok(Some(_))`: HTTP 200 with a non-empty `data` array.
    /// - `Ok(None)`: HTTP 200 with an empty or missing `data` array.
    /// - `Err(_)`: anything else.
    async fn lookup(&self, code: &ProductCode) -> Result<Option<ProductListing>, VendorError>;
}
