//! Telegram Bot API delivery using raw reqwest (no framework).
//!
//! Only `sendMessage` is needed: the bot never reads updates, it just posts
//! plain-text notifications to one configured chat.

use super::Notifier;
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::time::Duration;

use crate::error::DeliveryError;
use crate::verdict::Notification;

/// Telegram Bot API client bound to a single chat.
pub struct TelegramChannel {
    api_base: String,
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TgResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramChannel {
    pub fn new(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_base: api_base.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            client,
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }

    fn payload(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        })
    }
}

/// Interpret a `sendMessage` reply.
fn check_reply(
    status: reqwest::StatusCode,
    body: Option<TgResponse>,
) -> Result<(), DeliveryError> {
    let description = body
        .as_ref()
        .and_then(|b| b.description.clone())
        .unwrap_or_default();

    if !status.is_success() {
        return Err(DeliveryError::Status {
            status: status.as_u16(),
            description,
        });
    }

    match body {
        Some(TgResponse { ok: true, .. }) => Ok(()),
        _ => Err(DeliveryError::Rejected(description)),
    }
}

#[async_trait]
impl Notifier for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&self.payload(notification.as_str()))
            .send()
            .await
            .map_err(DeliveryError::Transport)?;

        let status = resp.status();
        // Error replies usually carry a JSON description; keep going without it.
        let body = resp.json::<TgResponse>().await.ok();
        check_reply(status, body)?;

        debug!("message delivered to Telegram chat {}", self.chat_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn channel() -> TelegramChannel {
        TelegramChannel::new(
            "https://api.telegram.org/",
            "123:abc",
            "-10042",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_api_url() {
        assert_eq!(
            channel().api_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_payload_is_plain_text() {
        let payload = channel().payload("Изменился статус");
        assert_eq!(payload["chat_id"], "-10042");
        assert_eq!(payload["text"], "Изменился статус");
        assert!(payload.get("parse_mode").is_none());
    }

    #[test]
    fn test_check_reply_ok() {
        let body = TgResponse {
            ok: true,
            description: None,
        };
        assert!(check_reply(StatusCode::OK, Some(body)).is_ok());
    }

    #[test]
    fn test_check_reply_http_error_keeps_description() {
        let body = TgResponse {
            ok: false,
            description: Some("Bad Request: chat not found".into()),
        };
        match check_reply(StatusCode::BAD_REQUEST, Some(body)) {
            Err(DeliveryError::Status {
                status,
                description,
            }) => {
                assert_eq!(status, 400);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn test_check_reply_not_ok() {
        let body = TgResponse {
            ok: false,
            description: Some("flood".into()),
        };
        assert!(matches!(
            check_reply(StatusCode::OK, Some(body)),
            Err(DeliveryError::Rejected(ref d)) if d == "flood"
        ));
    }

    #[test]
    fn test_check_reply_unreadable_body() {
        assert!(matches!(
            check_reply(StatusCode::OK, None),
            Err(DeliveryError::Rejected(_))
        ));
    }
}
