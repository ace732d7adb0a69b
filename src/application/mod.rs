//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: the chat backend behind the dispatcher
//! - Errors: Domain-specific errors
//! - Messaging: Parsing, menus, fire-and-forget sending, dispatching

pub mod errors;
pub mod services;
pub mod messaging;

#[cfg(test)]
pub mod testing;
