//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Platform integrations (Telegram)
//! - LLM: Chat-completion providers

pub mod config;
pub mod adapters;
pub mod llm;
