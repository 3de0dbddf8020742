use codeloop_model::ToolCallRequest;
use serde::{Deserialize, Serialize};

/// One output item in a scripted response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetItem {
    #[serde(rename = "message")]
    Message(String),
    #[serde(rename = "tool_call")]
    ToolCall(ToolCallRequest),
}

/// What the scripted model should answer to one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Output items of this response.
    pub items: Vec<PresetItem>,
    /// If set, the first `failures` attempts at this response fail
    /// before one succeeds. `Some(0)` fails every attempt.
    pub failures: Option<u64>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the given output items.
    #[inline]
    pub fn with_items(items: impl Into<Vec<PresetItem>>) -> Self {
        Self {
            items: items.into(),
            failures: None,
        }
    }

    /// Makes the first `failures` attempts at this response fail. `0`
    /// makes every attempt fail.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = Some(failures);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let response = PresetResponse::with_items([
            PresetItem::Message("Let me try that first.".to_string()),
            PresetItem::ToolCall(ToolCallRequest {
                id: "call:1".to_string(),
                name: "run_python".to_string(),
                arguments: "{\"code\": \"print('hi')\"}".to_string(),
            }),
        ]);

        let serialized = serde_json::to_string(&response).unwrap();
        let deserialized: PresetResponse =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(response, deserialized);
    }
}
