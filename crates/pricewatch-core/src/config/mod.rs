//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. `PRICEWATCH_*` environment variables (`__` as section separator)
//! 2. Legacy flat variables `MEMBER_CODE`, `SIGNATURE`, `TELEGRAM_TOKEN`,
//!    `TELEGRAM_CHAT_ID`
//! 3. TOML file (`pricewatch.toml`, or the path given explicitly)
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `PRICEWATCH_VENDOR__MEMBER_CODE` -> `vendor.member_code`,
//! `PRICEWATCH_NOTIFY__MODE=always` -> `notify.mode`,
//! `PRICEWATCH_CODES=MLA878,MLAWP1` -> `codes`.
//!
//! Credential variables are taken verbatim: `SIGNATURE=000123` stays
//! `"000123"` rather than being parsed as a number.

mod error;
mod sections;

pub use error::ConfigError;
pub use sections::{
    ExportConfig, NotifyConfig, RetryConfig, ServerConfig, SnapshotConfig, TelegramConfig,
    VendorConfig,
};

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::app::{CycleSettings, RetryPolicy};
use crate::domain::ProductCode;

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pricewatch.toml";

const LEGACY_ENV: [(&str, &str); 4] = [
    ("MEMBER_CODE", "vendor.member_code"),
    ("SIGNATURE", "vendor.signature"),
    ("TELEGRAM_TOKEN", "telegram.bot_token"),
    ("TELEGRAM_CHAT_ID", "telegram.chat_id"),
];

const CREDENTIAL_KEYS: [&str; 4] = [
    "vendor.member_code",
    "vendor.signature",
    "telegram.bot_token",
    "telegram.chat_id",
];

type SectionMap = BTreeMap<String, BTreeMap<String, String>>;

/// Credential keys of `env` as plain strings, nested by section.
fn verbatim_credentials(env: &Env) -> Serialized<SectionMap> {
    let mut sections = SectionMap::new();
    for (key, value) in env.iter() {
        let key = key.as_str().to_ascii_lowercase();
        if !CREDENTIAL_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some((section, field)) = key.split_once('.') {
            sections
                .entry(section.to_string())
                .or_default()
                .insert(field.to_string(), value);
        }
    }
    Serialized::defaults(sections)
}

fn default_codes() -> Vec<String> {
    ["MLAWP1", "MLA12976", "MLA2195", "MLA1412", "MLA1220", "MLA878", "MLBB716"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceWatchConfig {
    #[serde(default)]
    pub vendor: VendorConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub server: ServerConfig,

    /// Codes polled by `run` and `watch` when none are given.
    #[serde(default = "default_codes", deserialize_with = "sections::code_list")]
    pub codes: Vec<String>,
}

impl Default for PriceWatchConfig {
    fn default() -> Self {
        Self {
            vendor: VendorConfig::default(),
            telegram: TelegramConfig::default(),
            snapshot: SnapshotConfig::default(),
            notify: NotifyConfig::default(),
            retry: RetryConfig::default(),
            export: ExportConfig::default(),
            server: ServerConfig::default(),
            codes: default_codes(),
        }
    }
}

impl PriceWatchConfig {
    /// Load configuration from defaults, TOML and environment.
    ///
    /// With `file = None`, `pricewatch.toml` is used if it exists. An
    /// explicitly given file must exist.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = file.filter(|p| !p.exists()) {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        Self::figment(file).extract().map_err(ConfigError::from)
    }

    /// Load `.env` from the working directory first, then [`Self::load`].
    pub fn load_with_dotenv(file: Option<&Path>) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "failed to read .env"),
        }
        Self::load(file)
    }

    /// Build the figment provider chain.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let path = file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }

        let legacy = Env::raw()
            .only(&LEGACY_ENV.map(|(var, _)| var))
            .map(|key| {
                LEGACY_ENV
                    .iter()
                    .find(|(var, _)| key.as_str().eq_ignore_ascii_case(var))
                    .map(|(_, target)| (*target).into())
                    .unwrap_or_else(|| key.as_str().to_owned().into())
            });

        let prefixed = Env::prefixed("PRICEWATCH_").split("__");

        figment
            .merge(verbatim_credentials(&legacy))
            .merge(prefixed.clone())
            .merge(verbatim_credentials(&prefixed))
    }

    /// Fail fast on values the cycle cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.vendor.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "vendor".to_string(),
            });
        }
        if self.retry.attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.export.file_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "export.file_prefix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        self.listen_addr()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .listen
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                field: "server.listen".to_string(),
                reason: e.to_string(),
            })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.retry.attempts, Duration::from_millis(self.retry.delay_ms))
    }

    pub fn cycle_settings(&self) -> CycleSettings {
        CycleSettings {
            notify: self.notify.mode,
            export: self.notify.export,
            baseline_on_first_run: self.notify.baseline_on_first_run,
            export_caption: self.export.caption.clone(),
        }
    }

    pub fn product_codes(&self) -> Vec<ProductCode> {
        self.codes.iter().map(ProductCode::new).collect()
    }
}
