//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod chat;

pub use bot::{Bot, BotInfo, KeyboardButton};
pub use chat::{ConversationHandler, PreferenceStore};
