/// Classification of an inbound text payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Models,
    Temperature,
    /// Starts with the command prefix but is not a reserved command.
    UnknownSlash(String),
    PlainText(String),
}

impl Command {
    /// Literal text of the reserved commands, as users type them.
    pub const START: &'static str = "/start";
    pub const STOP: &'static str = "/stop";
    pub const MODELS: &'static str = "/models";
    pub const TEMPERATURE: &'static str = "/temperature";

    pub fn name(&self) -> &str {
        match self {
            Command::Start => "start",
            Command::Stop => "stop",
            Command::Models => "models",
            Command::Temperature => "temperature",
            Command::UnknownSlash(_) => "unknown",
            Command::PlainText(_) => "text",
        }
    }
}

/// Entry of the platform-side command menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

impl BotCommand {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
        }
    }

    /// The menu registered with the platform at startup.
    pub fn menu() -> Vec<BotCommand> {
        vec![
            BotCommand::new(Command::START, "Start a conversation"),
            BotCommand::new(Command::STOP, "Stop the current conversation"),
            BotCommand::new(Command::MODELS, "Choose a model"),
            BotCommand::new(Command::TEMPERATURE, "Set the conversation temperature"),
        ]
    }
}

/// Decoded inline-button payload
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackPayload {
    Model(String),
    Temperature(f32),
    /// `temp:` prefix with a value that is not a usable temperature.
    MalformedTemperature(String),
    Unrecognized,
}

impl CallbackPayload {
    pub const MODEL_PREFIX: &'static str = "model";
    pub const TEMPERATURE_PREFIX: &'static str = "temp";
    pub const SEPARATOR: char = ':';

    pub fn model_data(model: &str) -> String {
        format!("{}{}{}", Self::MODEL_PREFIX, Self::SEPARATOR, model)
    }

    pub fn temperature_data(value: &str) -> String {
        format!("{}{}{}", Self::TEMPERATURE_PREFIX, Self::SEPARATOR, value)
    }
}
