//! Message parser - Classifies text payloads and decodes callback data

use crate::domain::entities::{CallbackPayload, Command};

/// Highest temperature accepted from a callback payload
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Turns raw text and button payloads into structured values
pub struct MessageParser {
    command_prefix: char,
}

impl MessageParser {
    pub fn new(prefix: char) -> Self {
        Self {
            command_prefix: prefix,
        }
    }

    /// Classify a text payload.
    ///
    /// Reserved commands match exactly: case-sensitive and untrimmed, so
    /// `/start@bot` or `/Start ` are unknown commands.
    pub fn classify(&self, text: &str) -> Command {
        match text {
            Command::START => Command::Start,
            Command::STOP => Command::Stop,
            Command::MODELS => Command::Models,
            Command::TEMPERATURE => Command::Temperature,
            _ if text.starts_with(self.command_prefix) => Command::UnknownSlash(text.to_string()),
            _ => Command::PlainText(text.to_string()),
        }
    }

    /// Decode an inline-button payload of the form `<prefix>:<value>`
    pub fn parse_callback(&self, raw: &str) -> CallbackPayload {
        let Some((prefix, value)) = raw.split_once(CallbackPayload::SEPARATOR) else {
            return CallbackPayload::Unrecognized;
        };

        match prefix {
            CallbackPayload::MODEL_PREFIX => CallbackPayload::Model(value.to_string()),
            CallbackPayload::TEMPERATURE_PREFIX => match value.parse::<f32>() {
                Ok(t) if t.is_finite() && (0.0..=MAX_TEMPERATURE).contains(&t) => {
                    CallbackPayload::Temperature(t)
                }
                _ => CallbackPayload::MalformedTemperature(value.to_string()),
            },
            _ => CallbackPayload::Unrecognized,
        }
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_commands_match_exactly() {
        let parser = MessageParser::default();
        assert_eq!(parser.classify("/start"), Command::Start);
        assert_eq!(parser.classify("/stop"), Command::Stop);
        assert_eq!(parser.classify("/models"), Command::Models);
        assert_eq!(parser.classify("/temperature"), Command::Temperature);
    }

    #[test]
    fn near_misses_are_unknown_commands() {
        let parser = MessageParser::default();
        for text in ["/Start", "/start ", "/start now", "/startx", "/help"] {
            assert_eq!(parser.classify(text), Command::UnknownSlash(text.to_string()), "{text}");
        }
    }

    #[test]
    fn other_text_is_plain() {
        let parser = MessageParser::default();
        assert_eq!(parser.classify("hello"), Command::PlainText("hello".to_string()));
        assert_eq!(parser.classify(" /start"), Command::PlainText(" /start".to_string()));
    }

    #[test]
    fn model_payload_keeps_everything_after_first_separator() {
        let parser = MessageParser::default();
        assert_eq!(
            parser.parse_callback("model:gpt-4o"),
            CallbackPayload::Model("gpt-4o".to_string())
        );
        assert_eq!(
            parser.parse_callback("model:org:custom"),
            CallbackPayload::Model("org:custom".to_string())
        );
    }

    #[test]
    fn temperature_payloads() {
        let parser = MessageParser::default();
        assert_eq!(parser.parse_callback("temp:0.7"), CallbackPayload::Temperature(0.7));
        assert_eq!(parser.parse_callback("temp:1"), CallbackPayload::Temperature(1.0));
        assert_eq!(
            parser.parse_callback("temp:warm"),
            CallbackPayload::MalformedTemperature("warm".to_string())
        );
        assert_eq!(
            parser.parse_callback("temp:NaN"),
            CallbackPayload::MalformedTemperature("NaN".to_string())
        );
        assert_eq!(
            parser.parse_callback("temp:3.5"),
            CallbackPayload::MalformedTemperature("3.5".to_string())
        );
    }

    #[test]
    fn unknown_payloads_are_unrecognized() {
        let parser = MessageParser::default();
        assert_eq!(parser.parse_callback("lang:en"), CallbackPayload::Unrecognized);
        assert_eq!(parser.parse_callback("model"), CallbackPayload::Unrecognized);
        assert_eq!(parser.parse_callback(""), CallbackPayload::Unrecognized);
    }
}
