//! PriceWatch - 1 サイクルのオーケストレーション
//!
//! # フロー
//! 1. Fetcher でコードごとに価格取得（失敗はレコード化）
//! 2. SnapshotStore::load() で前回スナップショット取得
//! 3. detect() で changed / unchanged に分類
//! 4. NotifyMode / ExportMode に従って通知・エクスポート
//! 5. SnapshotStore::save() で全置換
//!
//! 通知の失敗はサイクルを落とさない。スナップショットの読み書き失敗と
//! エクスポート生成失敗は CycleError として呼び出し側に返す。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::Instrument;
use ulid::Ulid;

use crate::domain::{
    ChangeReport, CycleStage, PriceChange, PriceRecord, ProductCode, Snapshot, detect,
};
use crate::ports::{
    Clock, Document, ExportError, SnapshotError, SnapshotStore, SpreadsheetExporter,
};

use super::fetcher::Fetcher;
use super::message::EXPORT_CAPTION;
use super::modes::{ExportMode, NotifyMode};
use super::notifier::{DeliveryOutcome, Notifier};

/// Per-cycle switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSettings {
    pub notify: NotifyMode,
    pub export: ExportMode,
    /// Persist the first batch silently when no snapshot exists yet.
    pub baseline_on_first_run: bool,
    pub export_caption: String,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            notify: NotifyMode::default(),
            export: ExportMode::default(),
            baseline_on_first_run: false,
            export_caption: EXPORT_CAPTION.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("snapshot {stage} failed: {source}")]
    Snapshot {
        stage: CycleStage,
        #[source]
        source: SnapshotError,
    },

    #[error("export failed: {source}")]
    Export {
        #[source]
        source: ExportError,
    },
}

impl CycleError {
    /// Stage the cycle was in when it failed.
    pub fn stage(&self) -> CycleStage {
        match self {
            Self::Snapshot { stage, .. } => *stage,
            Self::Export { .. } => CycleStage::Export,
        }
    }
}

/// What one successful cycle did.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_id: Ulid,
    pub started_at: DateTime<Utc>,
    pub records: Vec<PriceRecord>,
    pub changes: ChangeReport,
    /// The batch was stored as the first baseline; nothing was sent.
    pub baseline: bool,
    pub notification: Option<DeliveryOutcome>,
    pub export: Option<Document>,
    pub export_delivery: Option<DeliveryOutcome>,
}

/// JSON body returned by the trigger surface.
#[derive(Debug, Clone, Serialize)]
pub struct CycleSummary {
    pub cycle_id: String,
    pub fetched: usize,
    pub changed: Vec<PriceChange>,
    pub unchanged: usize,
    pub baseline: bool,
    pub notification: Option<DeliveryOutcome>,
    pub export_file: Option<String>,
    pub export_delivery: Option<DeliveryOutcome>,
}

impl CycleReport {
    pub fn summary(&self) -> CycleSummary {
        CycleSummary {
            cycle_id: self.cycle_id.to_string(),
            fetched: self.records.len(),
            changed: self.changes.changed.clone(),
            unchanged: self.changes.unchanged.len(),
            baseline: self.baseline,
            notification: self.notification.clone(),
            export_file: self.export.as_ref().map(|d| d.file_name.clone()),
            export_delivery: self.export_delivery.clone(),
        }
    }
}

/// The orchestrator. Built by `PriceWatchBuilder`.
pub struct PriceWatch {
    pub(super) fetcher: Fetcher,
    pub(super) store: Arc<dyn SnapshotStore>,
    pub(super) notifier: Notifier,
    pub(super) exporter: Option<Arc<dyn SpreadsheetExporter>>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) settings: CycleSettings,
}

impl PriceWatch {
    /// Fetch and normalize without touching the snapshot or notifying.
    pub async fn fetch_only(&self, codes: &[ProductCode]) -> Vec<PriceRecord> {
        self.fetcher.fetch(codes).await
    }

    /// Run one full cycle.
    ///
    /// On failure one best-effort failure message is sent before the error
    /// is returned.
    pub async fn run_cycle(&self, codes: &[ProductCode]) -> Result<CycleReport, CycleError> {
        let cycle_id = Ulid::new();
        let span = tracing::info_span!("cycle", %cycle_id, codes = codes.len());

        let result = self.execute(cycle_id, codes).instrument(span.clone()).await;

        if let Err(e) = &result {
            async {
                tracing::error!(stage = %CycleStage::Failed, failed_at = %e.stage(), error = %e, "cycle failed");
                self.notifier.notify_failure(e).await;
            }
            .instrument(span)
            .await;
        }

        result
    }

    async fn execute(
        &self,
        cycle_id: Ulid,
        codes: &[ProductCode],
    ) -> Result<CycleReport, CycleError> {
        let started_at = self.clock.now();

        tracing::info!(stage = %CycleStage::Fetch, "fetching prices");
        let records = self.fetcher.fetch(codes).await;

        tracing::debug!(stage = %CycleStage::LoadSnapshot, "loading snapshot");
        let previous = self
            .store
            .load()
            .await
            .map_err(|source| CycleError::Snapshot {
                stage: CycleStage::LoadSnapshot,
                source,
            })?;
        let current = Snapshot::from_records(records.iter().cloned());

        let mut report = CycleReport {
            cycle_id,
            started_at,
            records,
            changes: ChangeReport::default(),
            baseline: false,
            notification: None,
            export: None,
            export_delivery: None,
        };

        if self.settings.baseline_on_first_run && previous.is_empty() {
            tracing::info!(records = current.len(), "no previous snapshot, storing baseline");
            self.persist(&current).await?;
            report.baseline = true;
            tracing::info!(stage = %CycleStage::Done, "cycle finished");
            return Ok(report);
        }

        report.changes = detect(&report.records, &previous);
        tracing::info!(
            stage = %CycleStage::Detect,
            changed = report.changes.changed.len(),
            unchanged = report.changes.unchanged.len(),
            "changes detected"
        );

        if self.settings.notify.should_notify(&report.changes) {
            tracing::debug!(stage = %CycleStage::Notify, "sending report");
            let include_unchanged = self.settings.notify.lists_unchanged();
            report.notification = Some(self.notifier.notify(&report.changes, include_unchanged).await);
        } else {
            tracing::debug!(stage = %CycleStage::SkipNotify, "nothing to report");
        }

        let mut export_error = None;
        if self.settings.export.should_export(&report.changes) {
            match self.export(&report.records, started_at).await {
                Ok((document, delivery)) => {
                    report.export = Some(document);
                    report.export_delivery = Some(delivery);
                }
                Err(e) => {
                    tracing::error!(stage = %CycleStage::Export, error = %e, "export failed");
                    export_error = Some(e);
                }
            }
        }

        self.persist(&current).await?;

        if let Some(source) = export_error {
            return Err(CycleError::Export { source });
        }

        tracing::info!(stage = %CycleStage::Done, "cycle finished");
        Ok(report)
    }

    async fn export(
        &self,
        records: &[PriceRecord],
        at: DateTime<Utc>,
    ) -> Result<(Document, DeliveryOutcome), ExportError> {
        let exporter = self
            .exporter
            .as_ref()
            .ok_or_else(|| ExportError::Generate("no exporter configured".to_string()))?;
        let document = exporter.export(records, at)?;
        tracing::info!(stage = %CycleStage::Export, file = %document.file_name, bytes = document.bytes.len(), "spreadsheet generated");

        let delivery = self
            .notifier
            .send_document(&document, &self.settings.export_caption)
            .await;
        Ok((document, delivery))
    }

    async fn persist(&self, snapshot: &Snapshot) -> Result<(), CycleError> {
        tracing::debug!(stage = %CycleStage::Persist, records = snapshot.len(), "saving snapshot");
        self.store
            .save(snapshot)
            .await
            .map_err(|source| CycleError::Snapshot {
                stage: CycleStage::Persist,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{PriceWatchBuilder, RetryPolicy};
    use crate::domain::Price;
    use crate::impls::{
        InMemorySnapshotStore, RecordingChannel, ScriptedAnswer, ScriptedPriceSource,
        XlsxExporter,
    };
    use crate::ports::FixedClock;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    struct BrokenExporter;

    impl SpreadsheetExporter for BrokenExporter {
        fn export(&self, _: &[PriceRecord], _: DateTime<Utc>) -> Result<Document, ExportError> {
            Err(ExportError::Generate("disk full".to_string()))
        }
    }

    struct Harness {
        source: Arc<ScriptedPriceSource>,
        store: Arc<InMemorySnapshotStore>,
        channel: Arc<RecordingChannel>,
    }

    impl Harness {
        fn new(source: ScriptedPriceSource, store: InMemorySnapshotStore) -> Self {
            Self {
                source: Arc::new(source),
                store: Arc::new(store),
                channel: Arc::new(RecordingChannel::new()),
            }
        }

        fn watch(&self, settings: CycleSettings) -> PriceWatch {
            self.watch_with(settings, Arc::new(XlsxExporter::new("price_export")))
        }

        fn watch_with(
            &self,
            settings: CycleSettings,
            exporter: Arc<dyn SpreadsheetExporter>,
        ) -> PriceWatch {
            PriceWatchBuilder::new()
                .price_source(self.source.clone())
                .snapshot_store(self.store.clone())
                .channel(self.channel.clone())
                .exporter(exporter)
                .clock(Arc::new(FixedClock::new(
                    Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
                )))
                .retry(RetryPolicy::immediate(3))
                .settings(settings)
                .build()
                .unwrap()
        }
    }

    fn codes(list: &[&str]) -> Vec<ProductCode> {
        list.iter().map(|c| ProductCode::new(*c)).collect()
    }

    fn snapshot_of(records: Vec<PriceRecord>) -> Snapshot {
        Snapshot::from_records(records)
    }

    fn record(code: &str, name: &str, price: Price) -> PriceRecord {
        PriceRecord::new(ProductCode::new(code), name, price)
    }

    #[tokio::test]
    async fn first_cycle_reports_everything_as_changed() {
        let h = Harness::new(
            ScriptedPriceSource::new().listing("A", "Alpha", Price::amount(100)),
            InMemorySnapshotStore::new(),
        );
        let report = h.watch(CycleSettings::default()).run_cycle(&codes(&["A"])).await.unwrap();

        assert_eq!(
            report.changes.changed,
            vec![PriceChange {
                code: ProductCode::new("A"),
                name: "Alpha".to_string(),
                old_price: Price::not_available(),
                new_price: Price::amount(100),
            }]
        );
        assert!(report.changes.unchanged.is_empty());
        assert_eq!(h.channel.messages().len(), 1);
        assert_eq!(h.channel.documents(), vec!["price_export_20240501_083000.xlsx".to_string()]);
        assert_eq!(h.store.current(), snapshot_of(vec![record("A", "Alpha", Price::amount(100))]));
    }

    #[tokio::test]
    async fn unchanged_prices_send_nothing_in_on_change_mode() {
        let h = Harness::new(
            ScriptedPriceSource::new().listing("A", "Alpha", Price::amount(100)),
            InMemorySnapshotStore::with_snapshot(snapshot_of(vec![record(
                "A",
                "Alpha",
                Price::amount(100),
            )])),
        );
        let report = h.watch(CycleSettings::default()).run_cycle(&codes(&["A"])).await.unwrap();

        assert!(report.changes.changed.is_empty());
        assert_eq!(report.changes.unchanged.len(), 1);
        assert_eq!(report.notification, None);
        assert!(report.export.is_none());
        assert!(h.channel.delivered().is_empty());
        assert_eq!(h.store.save_count(), 1);
    }

    #[tokio::test]
    async fn always_mode_reports_even_without_changes() {
        let h = Harness::new(
            ScriptedPriceSource::new().listing("A", "Alpha", Price::amount(100)),
            InMemorySnapshotStore::with_snapshot(snapshot_of(vec![record(
                "A",
                "Alpha",
                Price::amount(100),
            )])),
        );
        let settings = CycleSettings {
            notify: NotifyMode::Always,
            export: ExportMode::Always,
            ..CycleSettings::default()
        };
        h.watch(settings).run_cycle(&codes(&["A"])).await.unwrap();

        let messages = h.channel.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Tidak Ada Perubahan Harga"));
        assert!(messages[0].contains("Produk Tanpa Perubahan Harga"));
        assert_eq!(h.channel.documents().len(), 1);
    }

    #[tokio::test]
    async fn rerun_with_identical_responses_is_idempotent() {
        let h = Harness::new(
            ScriptedPriceSource::new()
                .listing("A", "Alpha", Price::amount(100))
                .answer("B", ScriptedAnswer::Status(503)),
            InMemorySnapshotStore::new(),
        );
        let watch = h.watch(CycleSettings::default());

        watch.run_cycle(&codes(&["A", "B"])).await.unwrap();
        let first = h.store.current();
        let second = watch.run_cycle(&codes(&["A", "B"])).await.unwrap();

        assert!(second.changes.changed.is_empty());
        assert_eq!(second.changes.unchanged.len(), 2);
        assert_eq!(h.store.current(), first);
    }

    #[tokio::test]
    async fn price_change_is_reported_and_snapshot_replaced() {
        let h = Harness::new(
            ScriptedPriceSource::new().listing("A", "Alpha", Price::amount(100)),
            InMemorySnapshotStore::with_snapshot(snapshot_of(vec![
                record("A", "Alpha", Price::amount(90)),
                record("Z", "Gone", Price::amount(1)),
            ])),
        );
        let report = h.watch(CycleSettings::default()).run_cycle(&codes(&["A"])).await.unwrap();

        assert_eq!(report.changes.changed[0].old_price, Price::amount(90));
        assert!(h.channel.messages()[0].contains("<s>90</s>"));
        assert_eq!(h.store.current(), snapshot_of(vec![record("A", "Alpha", Price::amount(100))]));
    }

    #[tokio::test]
    async fn corrupt_snapshot_fails_the_cycle_without_saving() {
        let h = Harness::new(
            ScriptedPriceSource::new().listing("A", "Alpha", Price::amount(100)),
            InMemorySnapshotStore::corrupt(),
        );
        let err = h.watch(CycleSettings::default()).run_cycle(&codes(&["A"])).await.unwrap_err();

        assert_eq!(err.stage(), CycleStage::LoadSnapshot);
        assert_eq!(h.store.save_count(), 0);
        let messages = h.channel.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Error dalam proses:"));
    }

    #[tokio::test]
    async fn export_failure_still_persists_then_fails() {
        let h = Harness::new(
            ScriptedPriceSource::new().listing("A", "Alpha", Price::amount(100)),
            InMemorySnapshotStore::new(),
        );
        let err = h
            .watch_with(CycleSettings::default(), Arc::new(BrokenExporter))
            .run_cycle(&codes(&["A"]))
            .await
            .unwrap_err();

        assert_eq!(err.stage(), CycleStage::Export);
        assert_eq!(h.store.save_count(), 1);
        // change report plus failure message
        assert_eq!(h.channel.messages().len(), 2);
    }

    #[tokio::test]
    async fn save_failure_fails_the_cycle_at_persist() {
        let h = Harness::new(
            ScriptedPriceSource::new().listing("A", "Alpha", Price::amount(100)),
            InMemorySnapshotStore::read_only(),
        );
        let err = h.watch(CycleSettings::default()).run_cycle(&codes(&["A"])).await.unwrap_err();

        assert_eq!(err.stage(), CycleStage::Persist);
        assert!(matches!(err, CycleError::Snapshot { source: SnapshotError::Io { .. }, .. }));
        assert_eq!(h.store.save_count(), 0);

        let messages = h.channel.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("Alpha"));
        assert!(messages[1].starts_with("Error dalam proses:"));
        assert!(messages[1].contains("read-only"));
    }

    #[tokio::test]
    async fn undeliverable_notifications_do_not_fail_the_cycle() {
        let mut h = Harness::new(
            ScriptedPriceSource::new().listing("A", "Alpha", Price::amount(100)),
            InMemorySnapshotStore::new(),
        );
        h.channel = Arc::new(RecordingChannel::always_failing());
        let report = h.watch(CycleSettings::default()).run_cycle(&codes(&["A"])).await.unwrap();

        assert!(matches!(report.notification, Some(DeliveryOutcome::Dropped { attempts: 3, .. })));
        assert!(matches!(report.export_delivery, Some(DeliveryOutcome::Dropped { .. })));
        assert_eq!(h.store.save_count(), 1);
    }

    #[tokio::test]
    async fn baseline_on_first_run_is_silent() {
        let h = Harness::new(
            ScriptedPriceSource::new().listing("A", "Alpha", Price::amount(100)),
            InMemorySnapshotStore::new(),
        );
        let settings = CycleSettings {
            baseline_on_first_run: true,
            ..CycleSettings::default()
        };
        let watch = h.watch(settings);
        let report = watch.run_cycle(&codes(&["A"])).await.unwrap();

        assert!(report.baseline);
        assert!(h.channel.delivered().is_empty());
        assert_eq!(h.store.save_count(), 1);

        h.source.set(
            "A",
            ScriptedAnswer::Listing(crate::ports::ProductListing {
                name: "Alpha".to_string(),
                price: Price::amount(120),
            }),
        );
        let report = watch.run_cycle(&codes(&["A"])).await.unwrap();
        assert!(!report.baseline);
        assert_eq!(report.changes.changed.len(), 1);
    }

    #[tokio::test]
    async fn fetch_only_leaves_snapshot_alone() {
        let h = Harness::new(
            ScriptedPriceSource::new().listing("A", "Alpha", Price::amount(100)),
            InMemorySnapshotStore::new(),
        );
        let records = h.watch(CycleSettings::default()).fetch_only(&codes(&["A", "B"])).await;

        assert_eq!(records.len(), 2);
        assert!(records[1].price.is_error());
        assert_eq!(h.store.save_count(), 0);
        assert!(h.channel.delivered().is_empty());
    }

    #[tokio::test]
    async fn summary_lists_changes() {
        let h = Harness::new(
            ScriptedPriceSource::new().listing("A", "Alpha", Price::amount(100)),
            InMemorySnapshotStore::new(),
        );
        let report = h.watch(CycleSettings::default()).run_cycle(&codes(&["A"])).await.unwrap();
        let summary = serde_json::to_value(report.summary()).unwrap();

        assert_eq!(summary["fetched"], 1);
        assert_eq!(summary["changed"][0]["kode"], "A");
        assert_eq!(summary["changed"][0]["price_lama"], "N/A");
        assert_eq!(summary["notification"]["status"], "delivered");
        assert_eq!(summary["export_file"], "price_export_20240501_083000.xlsx");
    }
}
