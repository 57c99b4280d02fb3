//! Random scene-prompt generator.
//!
//! Prompts are built by picking a category (weighted), picking fragments from fixed
//! vocabularies and substituting them into a per-category template.

pub mod category;
pub mod generator;
pub mod template;
pub mod vocabulary;

pub use category::{Category, CategoryWeights};
pub use generator::{GeneratedPrompt, PromptGenerator, MAX_ACTORS};
pub use vocabulary::Vocabulary;
