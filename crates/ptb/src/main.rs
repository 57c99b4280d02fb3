use std::sync::Arc;

use ptb_core::{
    config::Config,
    prompt::{PromptGenerator, Vocabulary},
};
use ptb_http::LivenessServer;
use ptb_telegram::TelegramConnector;

#[tokio::main]
async fn main() -> Result<(), ptb_core::Error> {
    // Config first: `.env` may carry RUST_LOG.
    let cfg = Config::load()?;
    ptb_core::logging::init("ptb")?;

    let generator = Arc::new(PromptGenerator::new(
        Vocabulary::default(),
        cfg.prompt_weights,
    )?);

    let liveness = LivenessServer::start(cfg.liveness_addr()).await?;
    let connector = TelegramConnector::new(&cfg.telegram_bot_token, generator);

    ptb::run(&cfg, liveness, connector, ptb::shutdown_signal()).await
}
