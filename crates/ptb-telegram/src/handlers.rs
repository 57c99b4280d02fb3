//! Telegram update handlers.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};
use tracing::warn;

use ptb_core::{
    commands::{dispatch_text, SessionEvents},
    domain::ChatId,
    messaging::port::MessagingPort,
    session::SessionView,
};

pub struct HandlerState {
    pub events: Arc<dyn SessionEvents>,
    pub messenger: Arc<dyn MessagingPort>,
    pub session: SessionView,
}

pub async fn handle_message(msg: Message, state: Arc<HandlerState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat_id = ChatId(msg.chat.id.0);
    if let Err(e) = dispatch_text(
        state.events.as_ref(),
        state.messenger.as_ref(),
        &state.session,
        chat_id,
        text,
    )
    .await
    {
        warn!(chat_id = chat_id.0, error = %e, "failed to reply to command");
    }

    Ok(())
}
