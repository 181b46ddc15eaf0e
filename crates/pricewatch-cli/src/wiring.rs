//! Config → PriceWatch のワイヤリング

use std::sync::Arc;

use anyhow::Context;
use pricewatch_core::app::{PriceWatch, PriceWatchBuilder};
use pricewatch_core::config::PriceWatchConfig;
use pricewatch_core::impls::{
    JsonFileSnapshotStore, LogChannel, TelegramChannel, TokovoucherClient, XlsxExporter,
};
use pricewatch_core::ports::NotificationChannel;
use tracing::{info, warn};

pub fn channel(config: &PriceWatchConfig, dry_run: bool) -> Arc<dyn NotificationChannel> {
    if dry_run {
        info!("dry run: notifications go to the log");
        return Arc::new(LogChannel);
    }
    if !config.telegram.is_configured() {
        warn!("telegram is not configured: notifications go to the log");
        return Arc::new(LogChannel);
    }
    Arc::new(TelegramChannel::new(
        config.telegram.api_base.clone(),
        config.telegram.bot_token.clone(),
        config.telegram.chat_id.clone(),
    ))
}

pub fn build_watch(config: &PriceWatchConfig, dry_run: bool) -> anyhow::Result<PriceWatch> {
    let source = TokovoucherClient::new(
        config.vendor.base_url.clone(),
        config.vendor.member_code.clone(),
        config.vendor.signature.clone(),
    );

    let mut exporter = XlsxExporter::new(config.export.file_prefix.clone());
    if let Some(dir) = &config.export.output_dir {
        exporter = exporter.with_output_dir(dir.clone());
    }

    PriceWatchBuilder::new()
        .price_source(Arc::new(source))
        .snapshot_store(Arc::new(JsonFileSnapshotStore::new(
            config.snapshot.path.clone(),
        )))
        .channel(channel(config, dry_run))
        .exporter(Arc::new(exporter))
        .retry(config.retry_policy())
        .empty_data(config.vendor.empty_data)
        .settings(config.cycle_settings())
        .build()
        .context("failed to wire pricewatch")
}
