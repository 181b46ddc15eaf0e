//! NotificationChannel port - メッセージ / ファイルの配送先
//!
//! 宛先（chat id など）は実装側が持つ。
//! リトライはここではなく app::notifier が行う。

use async_trait::async_trait;
use thiserror::Error;

/// How the channel should interpret the message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    Plain,
    Html,
}

/// A file to attach, held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery transport error: {0}")]
    Transport(String),

    #[error("channel rejected delivery (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for DeliveryError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send_message(&self, text: &str, format: MessageFormat) -> Result<(), DeliveryError>;

    async fn send_document(&self, document: &Document, caption: &str)
    -> Result<(), DeliveryError>;
}
