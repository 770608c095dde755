use serde_json::{Map, Value};

pub const MESSAGE_BATCH_TYPE: &str = "MessageBatch";

/// A message batch that has passed structural validation.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBatch {
    pub routing_plan_id: String,
    pub message_batch_reference: Value,
    pub messages: Vec<BatchMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchMessage {
    pub message_reference: Value,
    pub recipient: Option<Value>,
    pub personalisation: Option<Value>,
}

impl BatchMessage {
    #[must_use]
    pub fn from_entry(entry: &Map<String, Value>, message_reference: Value) -> Self {
        Self {
            message_reference,
            recipient: entry.get("recipient").cloned(),
            personalisation: entry.get("personalisation").cloned(),
        }
    }

    /// True when personalisation is an object holding `body` and nothing else.
    #[must_use]
    pub fn has_single_body_personalisation(&self) -> bool {
        self.personalisation
            .as_ref()
            .and_then(Value::as_object)
            .is_some_and(|fields| fields.len() == 1 && fields.contains_key("body"))
    }
}

impl MessageBatch {
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Renders a routing plan id the way it is echoed back to callers: strings
/// verbatim, anything else as its JSON text.
#[must_use]
pub fn routing_plan_id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
