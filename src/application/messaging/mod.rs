//! Message handling - Event-driven message processing

pub mod dispatcher;
pub mod menus;
pub mod messenger;
pub mod parser;

pub use dispatcher::MessageDispatcher;
pub use messenger::Messenger;
pub use parser::MessageParser;
