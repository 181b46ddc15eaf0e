//! LogChannel - 配送の代わりにログへ出す（dry-run / Telegram 未設定時）

use async_trait::async_trait;

use crate::ports::{DeliveryError, Document, MessageFormat, NotificationChannel};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    async fn send_message(&self, text: &str, format: MessageFormat) -> Result<(), DeliveryError> {
        tracing::info!(?format, "notification:\n{text}");
        Ok(())
    }

    async fn send_document(
        &self,
        document: &Document,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        tracing::info!(
            file = %document.file_name,
            bytes = document.bytes.len(),
            caption,
            "document notification"
        );
        Ok(())
    }
}
