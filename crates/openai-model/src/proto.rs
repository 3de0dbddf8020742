use codeloop_model::{
    ModelMessage, ModelRequest, ModelResponse, ModelStatus, ModelTool,
    ModelUsage, OpaqueItem, OutputItem, OutputKind, ToolCallRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::OpenAIConfig;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ResponsesResponse {
    pub status: Option<String>,
    #[serde(default)]
    pub output: Vec<Value>,
    pub usage: Option<Usage>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct FunctionCallItem {
    call_id: String,
    name: String,
    arguments: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct MessageItem {
    #[serde(default)]
    content: Vec<MessageContent>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct MessageContent {
    text: Option<String>,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponsesRequest {
    model: String,
    input: Vec<InputItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
enum InputItem {
    Message {
        role: Role,
        content: String,
    },
    FunctionCallOutput {
        r#type: &'static str,
        call_id: String,
        output: String,
    },
    // An output item from a previous response, echoed back verbatim.
    Raw(Value),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct Tool {
    r#type: &'static str,
    name: String,
    description: String,
    parameters: Value,
    strict: bool,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &ModelRequest,
    config: &OpenAIConfig,
) -> ResponsesRequest {
    ResponsesRequest {
        model: config.model.clone(),
        input: req.messages.iter().map(create_input_item).collect(),
        tools: req.tools.iter().map(create_tool).collect(),
    }
}

#[inline]
fn create_input_item(msg: &ModelMessage) -> InputItem {
    match msg {
        ModelMessage::System(content) => InputItem::Message {
            role: Role::System,
            content: content.clone(),
        },
        ModelMessage::User(content) => InputItem::Message {
            role: Role::User,
            content: content.clone(),
        },
        ModelMessage::Assistant(content) => InputItem::Message {
            role: Role::Assistant,
            content: content.clone(),
        },
        ModelMessage::Tool(result) => InputItem::FunctionCallOutput {
            r#type: "function_call_output",
            call_id: result.id.clone(),
            output: result.content.clone(),
        },
        ModelMessage::Opaque(item) => InputItem::Raw(item.payload().clone()),
    }
}

#[inline]
fn create_tool(tool: &ModelTool) -> Tool {
    Tool {
        r#type: "function",
        name: tool.name.clone(),
        description: tool.description.clone(),
        parameters: tool.parameters.clone(),
        strict: true,
    }
}

pub fn parse_response(resp: ResponsesResponse) -> ModelResponse {
    let mut output = Vec::with_capacity(resp.output.len());
    let mut output_text = String::new();

    for (idx, value) in resp.output.into_iter().enumerate() {
        let kind = classify_item(&value);
        if let OutputKind::Message(text) = &kind {
            output_text.push_str(text);
        }
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("item:{idx}"));
        output.push(OutputItem {
            raw: OpaqueItem::new(id, value),
            kind,
        });
    }

    ModelResponse {
        output,
        usage: resp
            .usage
            .map(|usage| ModelUsage {
                input_tokens: usage.input_tokens,
                output_tokens: usage.output_tokens,
                total_tokens: usage.total_tokens,
            })
            .unwrap_or_default(),
        status: parse_status(resp.status.as_deref()),
        output_text,
    }
}

fn classify_item(value: &Value) -> OutputKind {
    match value.get("type").and_then(Value::as_str) {
        Some("function_call") => {
            match serde_json::from_value::<FunctionCallItem>(value.clone()) {
                Ok(call) => OutputKind::ToolCall(ToolCallRequest {
                    id: call.call_id,
                    name: call.name,
                    arguments: call.arguments,
                }),
                Err(err) => {
                    warn!("malformed function_call item: {err}");
                    OutputKind::Other
                }
            }
        }
        Some("message") => {
            let Ok(msg) = serde_json::from_value::<MessageItem>(value.clone())
            else {
                return OutputKind::Other;
            };
            let text: String = msg
                .content
                .into_iter()
                .filter_map(|content| content.text)
                .collect();
            OutputKind::Message(text)
        }
        _ => OutputKind::Other,
    }
}

#[inline]
fn parse_status(status: Option<&str>) -> ModelStatus {
    match status {
        Some("incomplete") => ModelStatus::Incomplete,
        Some("failed") => ModelStatus::Failed,
        _ => ModelStatus::Completed,
    }
}

#[cfg(test)]
mod tests {
    use codeloop_model::ToolCallResult;
    use serde_json::json;

    use super::*;
    use crate::OpenAIConfigBuilder;

    #[test]
    fn test_create_request() {
        let request = ModelRequest {
            messages: vec![
                ModelMessage::System("You are a coding agent.".to_owned()),
                ModelMessage::User("Sort a list".to_owned()),
                ModelMessage::Tool(ToolCallResult {
                    id: "call:1".to_owned(),
                    content: "[1, 2, 3]\n".to_owned(),
                }),
            ],
            tools: vec![ModelTool {
                name: "run_python".to_owned(),
                description: "Execute Python code.".to_owned(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "code": { "type": "string" }
                    },
                    "required": ["code"],
                    "additionalProperties": false
                }),
            }],
        };
        let config = OpenAIConfigBuilder::with_api_key("xxx")
            .with_model("custom")
            .build();
        let expected = ResponsesRequest {
            model: "custom".to_owned(),
            input: vec![
                InputItem::Message {
                    role: Role::System,
                    content: "You are a coding agent.".to_owned(),
                },
                InputItem::Message {
                    role: Role::User,
                    content: "Sort a list".to_owned(),
                },
                InputItem::FunctionCallOutput {
                    r#type: "function_call_output",
                    call_id: "call:1".to_owned(),
                    output: "[1, 2, 3]\n".to_owned(),
                },
            ],
            tools: vec![Tool {
                r#type: "function",
                name: "run_python".to_owned(),
                description: "Execute Python code.".to_owned(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "code": { "type": "string" }
                    },
                    "required": ["code"],
                    "additionalProperties": false
                }),
                strict: true,
            }],
        };
        assert_eq!(create_request(&request, &config), expected);
    }

    #[test]
    fn test_opaque_item_round_trip() {
        let raw = json!({
            "type": "reasoning",
            "id": "rs_1",
            "summary": []
        });
        let request = ModelRequest {
            messages: vec![ModelMessage::Opaque(OpaqueItem::new(
                "rs_1",
                raw.clone(),
            ))],
            tools: vec![],
        };
        let config = OpenAIConfigBuilder::with_api_key("xxx").build();
        let serialized =
            serde_json::to_value(create_request(&request, &config)).unwrap();
        assert_eq!(serialized["input"][0], raw);
    }

    #[test]
    fn test_parse_response() {
        let payload = json!({
            "id": "resp_1",
            "status": "completed",
            "output": [
                {
                    "type": "reasoning",
                    "id": "rs_1",
                    "summary": []
                },
                {
                    "type": "message",
                    "id": "msg_1",
                    "role": "assistant",
                    "content": [
                        { "type": "output_text", "text": "Let me check." }
                    ]
                },
                {
                    "type": "function_call",
                    "id": "fc_1",
                    "call_id": "call:1",
                    "name": "run_python",
                    "arguments": "{\"code\": \"print(1)\"}"
                }
            ],
            "usage": {
                "input_tokens": 12,
                "output_tokens": 34,
                "total_tokens": 46
            }
        });
        let resp: ResponsesResponse =
            serde_json::from_value(payload).unwrap();
        let parsed = parse_response(resp);

        assert_eq!(parsed.status, ModelStatus::Completed);
        assert_eq!(parsed.output_text, "Let me check.");
        assert_eq!(parsed.usage.total_tokens, 46);
        assert_eq!(parsed.output.len(), 3);

        let tool_calls: Vec<_> = parsed.tool_calls().collect();
        assert_eq!(tool_calls.len(), 1);
        assert_eq!(tool_calls[0].id, "call:1");
        assert_eq!(tool_calls[0].name, "run_python");
        assert_eq!(tool_calls[0].arguments, "{\"code\": \"print(1)\"}");

        // Raw items must survive for the next request.
        assert_eq!(parsed.output[0].raw.payload()["type"], "reasoning");
    }
}
