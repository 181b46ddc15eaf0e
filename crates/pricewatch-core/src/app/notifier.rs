//! Notifier - リトライ付きの配送
//!
//! 配送失敗でサイクルを落とさない。リトライを使い切ったらログに残して捨てる。

use std::sync::Arc;

use serde::Serialize;

use crate::domain::ChangeReport;
use crate::ports::{Document, MessageFormat, NotificationChannel};

use super::message::{render_failure, render_report};
use super::retry::RetryPolicy;

/// Result of one delivery after retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered { attempts: u32 },
    Dropped { attempts: u32, error: String },
}

pub struct Notifier {
    channel: Arc<dyn NotificationChannel>,
    retry: RetryPolicy,
}

impl Notifier {
    pub fn new(channel: Arc<dyn NotificationChannel>, retry: RetryPolicy) -> Self {
        Self { channel, retry }
    }

    pub async fn send_text(&self, text: &str, format: MessageFormat) -> DeliveryOutcome {
        let channel = &self.channel;
        let result = self
            .retry
            .run(|| channel.send_message(text, format))
            .await;

        match result {
            Ok(attempts) => {
                tracing::info!(attempts, "message delivered");
                DeliveryOutcome::Delivered { attempts }
            }
            Err(exhausted) => {
                tracing::error!(
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "message dropped after retries"
                );
                DeliveryOutcome::Dropped {
                    attempts: exhausted.attempts,
                    error: exhausted.last_error.to_string(),
                }
            }
        }
    }

    pub async fn send_document(&self, document: &Document, caption: &str) -> DeliveryOutcome {
        let channel = &self.channel;
        let result = self
            .retry
            .run(|| channel.send_document(document, caption))
            .await;

        match result {
            Ok(attempts) => {
                tracing::info!(attempts, file = %document.file_name, "document delivered");
                DeliveryOutcome::Delivered { attempts }
            }
            Err(exhausted) => {
                tracing::error!(
                    attempts = exhausted.attempts,
                    file = %document.file_name,
                    error = %exhausted.last_error,
                    "document dropped after retries"
                );
                DeliveryOutcome::Dropped {
                    attempts: exhausted.attempts,
                    error: exhausted.last_error.to_string(),
                }
            }
        }
    }

    /// Render and send the change report as HTML.
    pub async fn notify(&self, report: &ChangeReport, include_unchanged: bool) -> DeliveryOutcome {
        let text = render_report(report, include_unchanged);
        self.send_text(&text, MessageFormat::Html).await
    }

    /// One attempt, no retry, HTML like the report. Errors are only logged.
    pub async fn notify_failure(&self, error: &(dyn std::error::Error + Send + Sync)) {
        let text = render_failure(error);
        if let Err(e) = self.channel.send_message(&text, MessageFormat::Html).await {
            tracing::warn!(error = %e, "failure notification could not be delivered");
        }
    }
}
