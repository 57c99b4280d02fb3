use std::sync::Arc;

use async_trait::async_trait;
use teloxide::{dispatching::Dispatcher, dptree, prelude::*, types::BotCommand as TgCommand};
use tracing::{info, warn};

use ptb_core::{
    commands::{BotCommand, CommandAdapter, SessionEvents},
    domain::BotIdentity,
    messaging::port::MessagingPort,
    prompt::PromptGenerator,
    resilience::{ConnectOutcome, SessionConnector},
    session::SessionHandle,
};

use crate::handlers::{self, HandlerState};
use crate::{classify_request_error, TelegramMessenger};

/// Telegram session: `connect` validates the token with `getMe`, `serve` runs the
/// long-polling dispatcher until it stops.
pub struct TelegramConnector {
    bot: Bot,
    events: Arc<dyn SessionEvents>,
    messenger: Arc<dyn MessagingPort>,
}

impl TelegramConnector {
    pub fn new(token: &str, generator: Arc<PromptGenerator>) -> Self {
        let bot = Bot::new(token);
        Self {
            events: Arc::new(CommandAdapter::new(generator)),
            messenger: Arc::new(TelegramMessenger::new(bot.clone())),
            bot,
        }
    }

    async fn register_commands(&self) {
        let commands = BotCommand::ALL
            .into_iter()
            .map(|c| TgCommand::new(c.name(), c.description()));
        if let Err(e) = self.bot.set_my_commands(commands).await {
            warn!(error = %e, "failed to register bot commands");
        }
    }
}

#[async_trait]
impl SessionConnector for TelegramConnector {
    async fn connect(&mut self, session: &SessionHandle) -> ConnectOutcome {
        match self.bot.get_me().await {
            Ok(me) => {
                let identity = BotIdentity {
                    id: me.id.0,
                    username: me.username().to_string(),
                };
                self.events.on_ready(&identity);
                session.set_identity(identity);
                ConnectOutcome::Success
            }
            Err(e) => classify_request_error(&e),
        }
    }

    async fn serve(&mut self, session: &SessionHandle) -> ConnectOutcome {
        self.register_commands().await;

        let state = Arc::new(HandlerState {
            events: self.events.clone(),
            messenger: self.messenger.clone(),
            session: session.view(),
        });

        let handler =
            dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

        info!("polling for updates");
        Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![state])
            .default_handler(|_| async {})
            .build()
            .dispatch()
            .await;

        ConnectOutcome::Success
    }
}
