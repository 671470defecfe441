//! Pulls the answer text out of a Responses API body.
//!
//! The remote has shipped several shapes over time, so extraction is an
//! ordered list of strategies. Each one either finds non-empty text or
//! reports `None`; the first hit wins and [`NO_RESPONSE`] is the floor.

use serde::Serialize;
use serde_json::Value;

/// Answer used when no strategy finds any text
pub const NO_RESPONSE: &str = "No response";

/// Stand-in for a value that cannot be rendered as JSON text.
///
/// A `serde_json::Value` always renders, so this only shows up for other
/// serializable content passed through the same renderer.
pub const UNREADABLE_CONTENT: &str = "[unreadable content]";

/// Keys descended into, in order, when looking for text inside an object
const TEXT_KEYS: [&str; 4] = ["text", "value", "summary", "content"];

/// Top-level fields that carry the whole answer as text
const TOP_LEVEL_TEXT_FIELDS: [&str; 2] = ["output_text", "text"];

/// Keys an `output` item needs before it is considered a text carrier
const OUTPUT_ITEM_TEXT_KEYS: [&str; 3] = ["text", "summary", "content"];

/// A single extraction attempt over the full response body
pub type Strategy = fn(&Value) -> Option<String>;

/// Extraction strategies in the order they are tried
pub const STRATEGIES: [(&str, Strategy); 3] = [
    ("message_block", message_block),
    ("top_level_text", top_level_text),
    ("first_output_item", first_output_item),
];

/// Answer text of a response body, falling back to [`NO_RESPONSE`]
#[must_use]
pub fn response_text(response: &Value) -> String {
    STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let text = strategy(response)?;
            log::debug!("Response text found by {name} strategy");
            Some(text)
        })
        .unwrap_or_else(|| NO_RESPONSE.to_string())
}

/// `output[type=message].content[type=output_text | first]`
pub fn message_block(response: &Value) -> Option<String> {
    let message = response
        .get("output")?
        .as_array()?
        .iter()
        .find(|item| item.get("type").and_then(Value::as_str) == Some("message"))?;

    match message.get("content")? {
        Value::Array(items) => {
            let item = items
                .iter()
                .find(|item| item.get("type").and_then(Value::as_str) == Some("output_text"))
                .or_else(|| items.first())?;
            text_of(item)
        }
        other => text_of(other),
    }
}

/// `output_text` or `text` at the top level, when it holds actual text
///
/// A `text` object without text keys is format configuration, not an answer.
pub fn top_level_text(response: &Value) -> Option<String> {
    TOP_LEVEL_TEXT_FIELDS
        .iter()
        .find_map(|field| response.get(field).and_then(string_of))
}

/// First entry of `output` that carries `text`, `summary` or `content`
pub fn first_output_item(response: &Value) -> Option<String> {
    response
        .get("output")?
        .as_array()?
        .iter()
        .filter(|item| OUTPUT_ITEM_TEXT_KEYS.iter().any(|key| item.get(*key).is_some()))
        .find_map(string_of)
}

/// Text carried by a value, descending through nested text fields.
///
/// Strings are returned as-is, objects are searched through [`TEXT_KEYS`]
/// and arrays join their parts with newlines. Anything else, including an
/// object with none of the keys, is rendered as JSON text. Only used on
/// content already known to be the assistant's message.
#[must_use]
pub fn text_of(value: &Value) -> Option<String> {
    descend(value, true)
}

/// Like [`text_of`], but only accepts values that bottom out in a string
#[must_use]
pub fn string_of(value: &Value) -> Option<String> {
    descend(value, false)
}

fn descend(value: &Value, render_leftovers: bool) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => non_empty(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| descend(item, render_leftovers))
                .collect();
            non_empty(parts.join("\n"))
        }
        Value::Object(map) => {
            let nested: Vec<&Value> = TEXT_KEYS.iter().filter_map(|key| map.get(*key)).collect();
            if nested.is_empty() {
                render_leftovers.then(|| render(value))
            } else {
                nested
                    .into_iter()
                    .find_map(|child| descend(child, render_leftovers))
            }
        }
        Value::Bool(_) | Value::Number(_) => render_leftovers.then(|| render(value)),
    }
}

fn render<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| UNREADABLE_CONTENT.to_string())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}
