//! Application services

pub mod chat_service;

pub use chat_service::ChatService;
