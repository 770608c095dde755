use crate::domain::batch::{BatchMessage, MESSAGE_BATCH_TYPE, MessageBatch, routing_plan_id_text};
use crate::error::{AppError, Result};
use serde_json::Value;

/// Authorization value that simulates a client service ban.
pub const BANNED_AUTHORIZATION: &str = "banned";

/// The raw request body, decoded as far as it can be.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Absent,
    Malformed,
    Json(Value),
}

impl RequestBody {
    #[must_use]
    pub fn decode(raw: &[u8]) -> Self {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Self::Absent;
        }
        serde_json::from_slice(raw).map_or(Self::Malformed, Self::Json)
    }
}

/// Everything the validator looks at for one send request.
#[derive(Debug)]
pub struct Submission<'a> {
    authorization: Option<&'a str>,
    body: RequestBody,
}

/// `null`, `false`, `0` and `""` count as missing.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| is_truthy(v))
}

impl<'a> Submission<'a> {
    #[must_use]
    pub const fn new(authorization: Option<&'a str>, body: RequestBody) -> Self {
        Self { authorization, body }
    }

    fn json(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => present(Some(value)),
            RequestBody::Absent | RequestBody::Malformed => None,
        }
    }

    fn data(&self) -> Option<&Value> {
        present(self.json()?.get("data"))
    }

    fn data_type(&self) -> Option<&Value> {
        present(self.data()?.get("type"))
    }

    fn attribute(&self, name: &str) -> Option<&Value> {
        present(present(self.data()?.get("attributes"))?.get(name))
    }

    fn messages(&self) -> Option<&Vec<Value>> {
        self.data()?.get("attributes")?.get("messages")?.as_array()
    }

    fn message_references(&self) -> impl Iterator<Item = Option<&Value>> {
        self.messages()
            .into_iter()
            .flatten()
            .map(|message| message.as_object().and_then(|entry| entry.get("messageReference")))
    }

    /// Converts a fully validated submission into a typed batch.
    fn to_batch(&self) -> Option<MessageBatch> {
        let messages = self
            .messages()?
            .iter()
            .map(|message| {
                let entry = message.as_object()?;
                let reference = entry.get("messageReference")?.clone();
                Some(BatchMessage::from_entry(entry, reference))
            })
            .collect::<Option<Vec<_>>>()?;

        Some(MessageBatch {
            routing_plan_id: routing_plan_id_text(self.attribute("routingPlanId")?),
            message_batch_reference: self.attribute("messageBatchReference")?.clone(),
            messages,
        })
    }
}

struct Rule {
    violated: fn(&Submission<'_>) -> bool,
    reject: fn(String) -> AppError,
    message: &'static str,
}

fn is_banned(s: &Submission<'_>) -> bool {
    s.authorization == Some(BANNED_AUTHORIZATION)
}

fn is_malformed(s: &Submission<'_>) -> bool {
    matches!(s.body, RequestBody::Malformed)
}

fn missing_body(s: &Submission<'_>) -> bool {
    !is_malformed(s) && s.json().is_none()
}

fn missing_data(s: &Submission<'_>) -> bool {
    s.data().is_none()
}

fn missing_type(s: &Submission<'_>) -> bool {
    s.data_type().is_none()
}

fn wrong_type(s: &Submission<'_>) -> bool {
    s.data_type().and_then(Value::as_str) != Some(MESSAGE_BATCH_TYPE)
}

fn missing_attributes(s: &Submission<'_>) -> bool {
    s.data().and_then(|data| present(data.get("attributes"))).is_none()
}

fn missing_routing_plan_id(s: &Submission<'_>) -> bool {
    s.attribute("routingPlanId").is_none()
}

fn missing_batch_reference(s: &Submission<'_>) -> bool {
    s.attribute("messageBatchReference").is_none()
}

fn missing_messages(s: &Submission<'_>) -> bool {
    s.messages().is_none()
}

fn missing_message_reference(s: &Submission<'_>) -> bool {
    s.message_references().any(|reference| reference.is_none())
}

/// Numbers compare by numeric value, so `1` and `1.0` are the same reference.
fn same_reference(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn duplicate_message_reference(s: &Submission<'_>) -> bool {
    let mut seen: Vec<&Value> = Vec::new();
    s.message_references().flatten().any(|reference| {
        if seen.iter().any(|earlier| same_reference(earlier, reference)) {
            return true;
        }
        seen.push(reference);
        false
    })
}

/// Checked in order; the first violated rule decides the response.
const RULES: [Rule; 12] = [
    Rule {
        violated: is_banned,
        reject: AppError::Forbidden,
        message: "Request rejected because client service ban is in effect",
    },
    Rule { violated: is_malformed, reject: AppError::BadRequest, message: "Invalid request body" },
    Rule { violated: missing_body, reject: AppError::BadRequest, message: "Missing request body" },
    Rule { violated: missing_data, reject: AppError::BadRequest, message: "Missing request body data" },
    Rule { violated: missing_type, reject: AppError::BadRequest, message: "Missing request body data type" },
    Rule { violated: wrong_type, reject: AppError::BadRequest, message: "Request body data type is not MessageBatch" },
    Rule {
        violated: missing_attributes,
        reject: AppError::BadRequest,
        message: "Missing request body data attributes",
    },
    Rule { violated: missing_routing_plan_id, reject: AppError::BadRequest, message: "Missing routingPlanId" },
    Rule {
        violated: missing_batch_reference,
        reject: AppError::BadRequest,
        message: "Missing messageBatchReference",
    },
    Rule { violated: missing_messages, reject: AppError::BadRequest, message: "Missing messages array" },
    Rule {
        violated: missing_message_reference,
        reject: AppError::BadRequest,
        message: "Missing messageReferences",
    },
    Rule {
        violated: duplicate_message_reference,
        reject: AppError::BadRequest,
        message: "Duplicate messageReferences",
    },
];

/// Runs the structural checks in order and returns the typed batch.
///
/// # Errors
/// Returns the rejection of the first rule the submission violates.
pub fn validate(submission: &Submission<'_>) -> Result<MessageBatch> {
    if let Some(rule) = RULES.iter().find(|rule| (rule.violated)(submission)) {
        return Err((rule.reject)(rule.message.to_string()));
    }

    submission.to_batch().ok_or_else(|| AppError::Internal("Unable to read validated message batch".to_string()))
}
