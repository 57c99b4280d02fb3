/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the binary can decide
/// between "exit with a diagnostic" and "log and keep going".
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// The chat platform rejected the credential. Never retried.
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
