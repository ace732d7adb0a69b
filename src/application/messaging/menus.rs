//! Inline selection menus for models and temperatures

use crate::domain::entities::CallbackPayload;
use crate::domain::traits::KeyboardButton;

pub const MODEL_PROMPT: &str = "Please choose a model:";
pub const TEMPERATURE_PROMPT: &str = "Please choose a temperature:";

/// Offered models as (label, model id), in display order.
pub const MODEL_CHOICES: [(&str, &str); 8] = [
    ("GPT 4.1", "gpt-4.1"),
    ("GPT 4.1 Mini(L)", "gpt-4.1-mini"),
    ("GPT 4o", "gpt-4o"),
    ("Deepseek v3 0324", "DeepSeek-V3-0324"),
    ("Meta 4 Scout", "Llama-4-Scout-17B-16E-Instruct"),
    ("Meta 4 Maverick", "Llama-4-Maverick-17B-128E-Instruct-FP8"),
    ("Phi 4 Multimodal(L)", "Phi-4-multimodal-instruct"),
    ("MAI-DS-R1", "MAI-DS-R1"),
];

/// Offered temperatures as (label, value), in display order.
pub const TEMPERATURE_CHOICES: [(&str, &str); 5] = [
    ("Most precise 0.1", "0.1"),
    ("Precise 0.3", "0.3"),
    ("Balanced 0.5", "0.5"),
    ("Creative 0.7", "0.7"),
    ("Most creative 1.0", "1"),
];

/// One button per row, payload `model:<id>`
pub fn model_keyboard() -> Vec<Vec<KeyboardButton>> {
    MODEL_CHOICES
        .iter()
        .map(|(label, id)| {
            vec![KeyboardButton::new(*label).with_callback(CallbackPayload::model_data(id))]
        })
        .collect()
}

/// One button per row, payload `temp:<value>`
pub fn temperature_keyboard() -> Vec<Vec<KeyboardButton>> {
    TEMPERATURE_CHOICES
        .iter()
        .map(|(label, value)| {
            let data = CallbackPayload::temperature_data(value);
            vec![KeyboardButton::new(*label).with_callback(data)]
        })
        .collect()
}
