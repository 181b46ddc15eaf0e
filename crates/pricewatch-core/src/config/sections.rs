//! Configuration sections.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

use crate::app::{EmptyDataPolicy, ExportMode, NotifyMode, EXPORT_CAPTION};
use crate::impls::{telegram, tokovoucher};

/// TOML may carry credentials as bare numbers (`chat_id = -100200300`).
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Uint(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Uint(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Bool(b) => b.to_string(),
    })
}

/// Accepts `["A", "B"]` or `"A,B"`.
pub(super) fn code_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Joined(String),
    }

    let raw = match Raw::deserialize(deserializer)? {
        Raw::List(list) => list,
        Raw::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };
    Ok(raw
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect())
}

fn default_vendor_base_url() -> String {
    tokovoucher::DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VendorConfig {
    #[serde(default = "default_vendor_base_url")]
    pub base_url: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub member_code: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub signature: String,

    /// What to record when the vendor answers without data.
    #[serde(default)]
    pub empty_data: EmptyDataPolicy,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            base_url: default_vendor_base_url(),
            member_code: String::new(),
            signature: String::new(),
            empty_data: EmptyDataPolicy::default(),
        }
    }
}

impl VendorConfig {
    pub fn is_configured(&self) -> bool {
        !self.member_code.is_empty() && !self.signature.is_empty()
    }
}

fn default_telegram_api_base() -> String {
    telegram::DEFAULT_API_BASE.to_string()
}

#[derive(Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub bot_token: String,

    /// Group chat ids are negative numbers; kept as text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_base", &self.api_base)
            .field("bot_token", &if self.bot_token.is_empty() { "" } else { "***" })
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_telegram_api_base(),
            bot_token: String::new(),
            chat_id: String::new(),
        }
    }
}

impl TelegramConfig {
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data_old.json")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub mode: NotifyMode,

    #[serde(default)]
    pub export: ExportMode,

    /// Store the first batch without notifying when no snapshot exists.
    #[serde(default)]
    pub baseline_on_first_run: bool,
}

const fn default_retry_attempts() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Total tries per delivery, including the first.
    #[serde(default = "default_retry_attempts")]
    pub attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_retry_attempts(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_file_prefix() -> String {
    "price_export".to_string()
}

fn default_caption() -> String {
    EXPORT_CAPTION.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Also keep a copy of each spreadsheet here.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default = "default_caption")]
    pub caption: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
            output_dir: None,
            caption: default_caption(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:5001".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}
