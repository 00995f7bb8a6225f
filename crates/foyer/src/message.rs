//! UI message types and translation into the backend chat schema.
//!
//! The browser UI sends multi-part messages; the backend accepts exactly one
//! text part per message. Translation is pure and total: the first text part
//! wins, a message without one becomes an empty string, and nothing is ever
//! dropped at the message level.

use serde::{Deserialize, Serialize};

/// A message as the browser UI represents it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiMessage {
    pub role: String,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// One part of a UI message.
///
/// Only `text` parts are understood here; every other part kind (tool calls,
/// attachments, ...) is carried opaquely and dropped during translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessagePart {
    Text(TextPart),
    Other(serde_json::Value),
}

impl MessagePart {
    /// The text content, when this is a `text` part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessagePart::Text(part) => Some(&part.text),
            MessagePart::Other(_) => None,
        }
    }
}

/// A `{"type": "text", "text": ...}` part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPart {
    #[serde(rename = "type")]
    kind: TextMarker,
    pub text: String,
}

impl TextPart {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: TextMarker::Text,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum TextMarker {
    #[serde(rename = "text")]
    Text,
}

/// Request body for the backend chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// One backend chat message. After translation `parts` always holds exactly
/// one text part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub parts: Vec<TextPart>,
}

/// Translate UI messages into the backend chat request.
///
/// Order and roles are preserved verbatim. For each message the first text
/// part is extracted; a message without one yields an empty string.
pub fn translate(messages: &[UiMessage]) -> ChatRequest {
    let messages = messages
        .iter()
        .map(|message| {
            let text = message
                .parts
                .iter()
                .find_map(MessagePart::as_text)
                .unwrap_or_default();
            ChatMessage {
                role: message.role.clone(),
                parts: vec![TextPart::new(text)],
            }
        })
        .collect();

    ChatRequest { messages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ui_message(role: &str, parts: serde_json::Value) -> UiMessage {
        serde_json::from_value(json!({ "role": role, "parts": parts })).unwrap()
    }

    #[test]
    fn translates_single_text_message() {
        let input = vec![ui_message("user", json!([{"type": "text", "text": "hello"}]))];

        let output = translate(&input);

        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({
                "messages": [
                    {"role": "user", "parts": [{"type": "text", "text": "hello"}]}
                ]
            })
        );
    }

    #[test]
    fn first_text_part_wins() {
        let input = vec![ui_message(
            "user",
            json!([
                {"type": "tool-call", "toolName": "search"},
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ]),
        )];

        let output = translate(&input);
        assert_eq!(output.messages[0].parts.len(), 1);
        assert_eq!(output.messages[0].parts[0].text, "first");
    }

    #[test]
    fn message_without_text_part_becomes_empty_string() {
        let input = vec![ui_message(
            "assistant",
            json!([{"type": "file", "url": "https://example.com/a.png"}]),
        )];

        let output = translate(&input);
        assert_eq!(output.messages.len(), 1);
        assert_eq!(output.messages[0].role, "assistant");
        assert_eq!(output.messages[0].parts[0].text, "");
    }

    #[test]
    fn message_with_no_parts_is_kept() {
        let input = vec![ui_message("user", json!([]))];

        let output = translate(&input);
        assert_eq!(output.messages.len(), 1);
        assert_eq!(output.messages[0].parts[0].text, "");
    }

    #[test]
    fn order_and_roles_are_preserved() {
        let input = vec![
            ui_message("user", json!([{"type": "text", "text": "question"}])),
            ui_message("assistant", json!([{"type": "text", "text": "answer"}])),
            ui_message("user", json!([{"type": "text", "text": "follow-up"}])),
        ];

        let output = translate(&input);
        assert_eq!(output.messages.len(), input.len());
        let roles: Vec<&str> = output.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "assistant", "user"]);
        assert_eq!(output.messages[2].parts[0].text, "follow-up");
    }

    #[test]
    fn unknown_part_kinds_deserialize_as_opaque() {
        let message = ui_message(
            "user",
            json!([
                {"type": "reasoning", "text": "thinking..."},
                {"type": "text", "text": "said"}
            ]),
        );

        // A non-text part with a `text` field must not be mistaken for a
        // text part.
        assert!(matches!(message.parts[0], MessagePart::Other(_)));
        assert_eq!(message.parts[1].as_text(), Some("said"));
    }

    #[test]
    fn translation_is_idempotent_on_its_own_output_shape() {
        let input = vec![ui_message("user", json!([{"type": "text", "text": "hi"}]))];
        let once = translate(&input);

        let roundtrip: Vec<UiMessage> =
            serde_json::from_value(serde_json::to_value(&once.messages).unwrap()).unwrap();
        let twice = translate(&roundtrip);

        assert_eq!(
            serde_json::to_value(&once).unwrap(),
            serde_json::to_value(&twice).unwrap()
        );
    }
}
