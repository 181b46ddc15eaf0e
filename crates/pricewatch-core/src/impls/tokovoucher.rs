//! Tokovoucher price API client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{NOT_AVAILABLE, Price, ProductCode};
use crate::ports::{PriceSource, ProductListing, VendorError};

pub const DEFAULT_BASE_URL: &str = "https://api.tokovoucher.net/produk/code";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    data: Option<Vec<Map<String, Value>>>,
}

/// Credentials are passed through untouched as query parameters.
pub struct TokovoucherClient {
    http: reqwest::Client,
    base_url: String,
    member_code: String,
    signature: String,
}

impl TokovoucherClient {
    pub fn new(
        base_url: impl Into<String>,
        member_code: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, member_code, signature)
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        member_code: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            member_code: member_code.into(),
            signature: signature.into(),
        }
    }

    fn request(&self, code: &ProductCode) -> reqwest::RequestBuilder {
        self.http.get(&self.base_url).query(&[
            ("member_code", self.member_code.as_str()),
            ("signature", self.signature.as_str()),
            ("kode", code.as_str()),
        ])
    }
}

#[async_trait]
impl PriceSource for TokovoucherClient {
    async fn lookup(&self, code: &ProductCode) -> Result<Option<ProductListing>, VendorError> {
        let resp = self.request(code).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(VendorError::Status {
                status: resp.status().as_u16(),
            });
        }
        let body: LookupResponse = resp.json().await?;
        Ok(first_listing(body))
    }
}

/// Take `data[0]`, defaulting missing `nama_produk` / `price` to `"N/A"`.
fn first_listing(body: LookupResponse) -> Option<ProductListing> {
    let first = body.data?.into_iter().next()?;
    let name = match first.get("nama_produk") {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(other) => other.to_string(),
    };
    let price = first
        .get("price")
        .cloned()
        .map(Price::from)
        .unwrap_or_else(Price::not_available);
    Some(ProductListing { name, price })
}
