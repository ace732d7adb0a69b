//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (User, InboundEvent, Command, AllowList)
//! - Traits: Abstractions for infrastructure (Bot, ConversationHandler, PreferenceStore)

pub mod entities;
pub mod traits;
