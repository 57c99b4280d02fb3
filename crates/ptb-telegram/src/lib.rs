//! Telegram adapter (teloxide).
//!
//! This crate implements the `ptb-core` messaging and session ports over the
//! Telegram Bot API.

use async_trait::async_trait;

use teloxide::{prelude::*, types::ParseMode, ApiError, RequestError};

use tokio::time::sleep;

pub mod connector;
pub mod handlers;

pub use connector::TelegramConnector;

use ptb_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::port::MessagingPort,
    resilience::ConnectOutcome,
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(RequestError::RetryAfter(after)) if attempts < MAX_RETRIES => {
                    attempts += 1;
                    sleep(after).await;
                }
                Err(other) => return Err(Self::map_err(other)),
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(Self::tg_chat(chat_id), html.to_string())
                    .parse_mode(ParseMode::Html)
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| self.bot.send_message(Self::tg_chat(chat_id), text.to_string()))
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }
}

/// Map a teloxide request failure onto the reconnect loop's outcome.
pub fn classify_request_error(e: &RequestError) -> ConnectOutcome {
    match e {
        // 401 "Unauthorized" (wrong token) parses as `NotFound`; a malformed token hits
        // a route Telegram does not serve and comes back as 404 "Not Found".
        RequestError::Api(ApiError::NotFound) => ConnectOutcome::AuthFailure(e.to_string()),
        RequestError::Api(ApiError::Unknown(desc)) if desc == "Not Found" => {
            ConnectOutcome::AuthFailure(e.to_string())
        }
        RequestError::Network(_) | RequestError::Io(_) | RequestError::RetryAfter(_) => {
            ConnectOutcome::TransientFailure(e.to_string())
        }
        _ => ConnectOutcome::UnknownFailure(e.to_string()),
    }
}
