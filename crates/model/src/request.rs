use serde_json::Value;

use crate::OpaqueItem;

/// Everything the provider needs for one completion exchange: the
/// conversation so far, plus the tools the model may call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelRequest {
    /// The conversation, oldest message first.
    pub messages: Vec<ModelMessage>,
    /// Tool declarations advertised for this request.
    pub tools: Vec<ModelTool>,
}

/// One entry in the conversation history.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelMessage {
    /// System instructions, sent at the head of the conversation.
    System(String),
    /// Text entered by the user.
    User(String),
    /// Text authored by the assistant.
    Assistant(String),
    /// The resolved output of an earlier tool call.
    Tool(ToolCallResult),
    /// A provider-owned item echoed back from a previous response.
    Opaque(OpaqueItem),
}

/// The resolved output of a tool call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolCallResult {
    /// Identifier of the tool call request this result answers.
    pub id: String,
    /// What the tool produced, as text for the model to read.
    pub content: String,
}

/// A tool declaration advertised to the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelTool {
    /// The name the model uses to call the tool.
    pub name: String,
    /// A description the model reads to decide when to use the tool.
    pub description: String,
    /// The parameter contract of the tool.
    ///
    /// Providers generally expect this to be a
    /// [JSON schema](https://json-schema.org/) describing one object.
    pub parameters: Value,
}
