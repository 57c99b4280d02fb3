//! Core domain + application logic for the prompt bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the HTTP liveness
//! listener live in adapter crates; they talk to the core through ports (traits).

pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod prompt;
pub mod resilience;
pub mod session;

pub use errors::{Error, Result};
