//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod event;
pub mod command;
pub mod allow_list;

pub use user::{User, UserId};
pub use event::InboundEvent;
pub use command::{Command, BotCommand, CallbackPayload};
pub use allow_list::AllowList;
