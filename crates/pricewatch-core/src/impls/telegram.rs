//! Telegram Bot API channel.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::ports::{DeliveryError, Document, MessageFormat, NotificationChannel};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Sends to a single chat.
///
/// Debug is intentionally not derived: the bot token is part of every URL.
pub struct TelegramChannel {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramChannel {
    pub fn new(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self::with_http(reqwest::Client::new(), api_base, bot_token, chat_id)
    }

    pub fn with_http(
        http: reqwest::Client,
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.bot_token,
            method
        )
    }

    fn message_params<'a>(&'a self, text: &'a str, format: MessageFormat) -> Vec<(&'a str, &'a str)> {
        let mut params = vec![("chat_id", self.chat_id.as_str()), ("text", text)];
        if format == MessageFormat::Html {
            params.push(("parse_mode", "HTML"));
        }
        params
    }
}

async fn check(resp: reqwest::Response) -> Result<(), DeliveryError> {
    if resp.status().is_success() {
        return Ok(());
    }
    Err(DeliveryError::Rejected {
        status: resp.status().as_u16(),
        body: resp.text().await.unwrap_or_default(),
    })
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    async fn send_message(&self, text: &str, format: MessageFormat) -> Result<(), DeliveryError> {
        let resp = self
            .http
            .post(self.method_url("sendMessage"))
            .form(&self.message_params(text, format))
            .send()
            .await?;
        check(resp).await
    }

    async fn send_document(
        &self,
        document: &Document,
        caption: &str,
    ) -> Result<(), DeliveryError> {
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str(document.content_type)?;
        let form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption.to_string())
            .part("document", part);

        let resp = self
            .http
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;
        check(resp).await
    }
}
