//! Chat command handling.
//!
//! The platform adapter feeds inbound text through [`dispatch_text`], which parses the
//! command, asks the [`SessionEvents`] implementation for a reply, and sends it.

use std::sync::Arc;

use chrono::Utc;

use crate::{
    domain::{BotIdentity, ChatId, MessageRef},
    formatting::{escape_html, format_duration},
    messaging::port::MessagingPort,
    prompt::{GeneratedPrompt, PromptGenerator},
    session::SessionView,
    Result,
};

pub const PING_REPLY: &str = "Pong!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotCommand {
    Ping,
    Prompt,
    Help,
    Status,
}

impl BotCommand {
    pub const ALL: [BotCommand; 4] = [
        BotCommand::Ping,
        BotCommand::Prompt,
        BotCommand::Status,
        BotCommand::Help,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ping" => Some(BotCommand::Ping),
            "prompt" => Some(BotCommand::Prompt),
            "help" | "start" => Some(BotCommand::Help),
            "status" => Some(BotCommand::Status),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BotCommand::Ping => "ping",
            BotCommand::Prompt => "prompt",
            BotCommand::Help => "help",
            BotCommand::Status => "status",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BotCommand::Ping => "check that the bot is alive",
            BotCommand::Prompt => "generate a random scene prompt",
            BotCommand::Help => "list commands",
            BotCommand::Status => "show connection status",
        }
    }
}

/// Split `"/cmd@botname arg1 ..."` (or `!cmd ...`) into `("cmd", "arg1 ...")`.
///
/// Returns `None` for text that is not a command.
pub fn parse_command(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    let body = text.strip_prefix('/').or_else(|| text.strip_prefix('!'))?;

    let mut parts = body.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first.split('@').next().unwrap_or("").to_lowercase();
    if cmd.is_empty() {
        return None;
    }
    Some((cmd, rest))
}

/// What the handler wants sent back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Html(String),
}

/// What a command may read while building its reply.
pub struct CommandContext<'a> {
    pub session: &'a SessionView,
}

/// Callbacks the chat session drives.
pub trait SessionEvents: Send + Sync {
    fn on_ready(&self, identity: &BotIdentity);
    fn on_command(&self, command: BotCommand, ctx: &CommandContext<'_>) -> Reply;
}

/// The bot's only `SessionEvents` implementation.
pub struct CommandAdapter {
    generator: Arc<PromptGenerator>,
}

impl CommandAdapter {
    pub fn new(generator: Arc<PromptGenerator>) -> Self {
        Self { generator }
    }
}

impl SessionEvents for CommandAdapter {
    fn on_ready(&self, identity: &BotIdentity) {
        tracing::info!(username = %identity.username, id = identity.id, "logged in");
    }

    fn on_command(&self, command: BotCommand, ctx: &CommandContext<'_>) -> Reply {
        match command {
            BotCommand::Ping => Reply::Text(PING_REPLY.to_string()),
            BotCommand::Prompt => Reply::Html(format_prompt_reply(&self.generator.generate())),
            BotCommand::Help => Reply::Html(format_help()),
            BotCommand::Status => Reply::Html(format_status(ctx.session)),
        }
    }
}

pub fn format_prompt_reply(prompt: &GeneratedPrompt) -> String {
    format!(
        "<b>Category:</b> {}\n<blockquote>{}</blockquote>",
        prompt.category,
        escape_html(&prompt.text)
    )
}

fn format_help() -> String {
    let mut out = String::from("<b>Commands</b>\n");
    for cmd in BotCommand::ALL {
        out.push_str(&format!("/{} - {}\n", cmd.name(), escape_html(cmd.description())));
    }
    out
}

fn format_status(session: &SessionView) -> String {
    let status = session.status();
    let mut out = format!(
        "<b>Session:</b> {}\n<b>Connect attempts:</b> {}",
        status.state, status.attempts
    );
    if let Some(since) = status.connected_since {
        let up = Utc::now().signed_duration_since(since).num_seconds();
        out.push_str(&format!("\n<b>Uptime:</b> {}", format_duration(up)));
    }
    if let Some(identity) = &status.identity {
        out.push_str(&format!("\n<b>Bot:</b> @{}", escape_html(&identity.username)));
    }
    out
}

/// Handle one inbound message. Non-commands and unknown commands get no reply.
pub async fn dispatch_text(
    events: &dyn SessionEvents,
    messenger: &dyn MessagingPort,
    session: &SessionView,
    chat_id: ChatId,
    text: &str,
) -> Result<Option<MessageRef>> {
    // No command takes arguments; trailing text is ignored.
    let Some((name, _args)) = parse_command(text) else {
        return Ok(None);
    };
    let Some(command) = BotCommand::from_name(&name) else {
        tracing::debug!(command = %name, "ignoring unknown command");
        return Ok(None);
    };

    let ctx = CommandContext { session };
    let sent = match events.on_command(command, &ctx) {
        Reply::Text(t) => messenger.send_text(chat_id, &t).await?,
        Reply::Html(h) => messenger.send_html(chat_id, &h).await?,
    };
    Ok(Some(sent))
}
