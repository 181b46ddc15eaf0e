//! PriceWatchBuilder - オーケストレーターの構築とワイヤリング
//!
//! # 起動時検証（Fail-fast 設計）
//! - 必須ポートが揃っていなければ build() が BuildError を返す
//! - ExportMode::Never 以外では exporter も必須
//! - Clock は省略時 SystemClock

use std::sync::Arc;

use crate::ports::{Clock, NotificationChannel, PriceSource, SnapshotStore, SpreadsheetExporter, SystemClock};

use super::cycle::{CycleSettings, PriceWatch};
use super::fetcher::Fetcher;
use super::modes::{EmptyDataPolicy, ExportMode};
use super::notifier::Notifier;
use super::retry::RetryPolicy;

/// # 使用例
/// ```ignore
/// let watch = PriceWatchBuilder::new()
///     .price_source(Arc::new(client))
///     .snapshot_store(Arc::new(store))
///     .channel(Arc::new(telegram))
///     .exporter(Arc::new(XlsxExporter::new("price_export")))
///     .build()?;
/// ```
#[derive(Default)]
pub struct PriceWatchBuilder {
    source: Option<Arc<dyn PriceSource>>,
    store: Option<Arc<dyn SnapshotStore>>,
    channel: Option<Arc<dyn NotificationChannel>>,
    exporter: Option<Arc<dyn SpreadsheetExporter>>,
    clock: Option<Arc<dyn Clock>>,
    retry: RetryPolicy,
    empty_data: EmptyDataPolicy,
    settings: CycleSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing components: {0:?}. These must be provided before build().")]
    MissingComponents(Vec<&'static str>),
}

impl PriceWatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn exporter(mut self, exporter: Arc<dyn SpreadsheetExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn empty_data(mut self, policy: EmptyDataPolicy) -> Self {
        self.empty_data = policy;
        self
    }

    pub fn settings(mut self, settings: CycleSettings) -> Self {
        self.settings = settings;
        self
    }

    /// # 検証
    /// 不足しているコンポーネント名をすべて集めて BuildError::MissingComponents を返す
    pub fn build(self) -> Result<PriceWatch, BuildError> {
        let mut missing = Vec::new();
        if self.source.is_none() {
            missing.push("price_source");
        }
        if self.store.is_none() {
            missing.push("snapshot_store");
        }
        if self.channel.is_none() {
            missing.push("channel");
        }
        if self.exporter.is_none() && self.settings.export != ExportMode::Never {
            missing.push("exporter");
        }

        let (Some(source), Some(store), Some(channel)) = (self.source, self.store, self.channel)
        else {
            return Err(BuildError::MissingComponents(missing));
        };
        if !missing.is_empty() {
            return Err(BuildError::MissingComponents(missing));
        }

        Ok(PriceWatch {
            fetcher: Fetcher::new(source, self.empty_data),
            store,
            notifier: Notifier::new(channel, self.retry),
            exporter: self.exporter,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            settings: self.settings,
        })
    }
}
