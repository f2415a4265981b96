//! Conversion from client turns to provider messages.

use relaychat_types::chat::{MessagePart, UiMessage};
use relaychat_types::llm::{Message, MessageRole};

/// System instruction plus the ordered conversation, ready for a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPrompt {
    pub system: String,
    pub messages: Vec<Message>,
}

/// Map client turns into the provider's message schema.
///
/// - text parts are concatenated in order; every other part type is dropped
///   and logged at debug level
/// - `system` turns are appended to the system instruction instead of the
///   message list
/// - turns left with no text are skipped, since providers reject empty turns
pub fn convert_to_model_messages(system: &str, turns: &[UiMessage]) -> ModelPrompt {
    let mut system = system.to_string();
    let mut messages = Vec::with_capacity(turns.len());

    for turn in turns {
        let mut content = String::new();
        for part in &turn.parts {
            match part {
                MessagePart::Text { text } => content.push_str(text),
                MessagePart::Other { kind, .. } => {
                    tracing::debug!(
                        turn_id = %turn.id,
                        part_type = %kind,
                        "dropping non-text message part"
                    );
                }
            }
        }

        if content.is_empty() {
            tracing::debug!(turn_id = %turn.id, role = %turn.role, "skipping turn without text");
            continue;
        }

        match turn.role {
            MessageRole::System => {
                system.push_str("\n\n");
                system.push_str(&content);
            }
            role => messages.push(Message { role, content }),
        }
    }

    ModelPrompt { system, messages }
}
