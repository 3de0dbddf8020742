use serde::{Deserialize, Serialize};

use crate::OpaqueItem;

/// A complete response from the model provider.
///
/// The `output` field preserves the items in the exact order the
/// provider produced them. Callers are expected to append every item to
/// the conversation (via [`OutputItem::raw`]) before sending the next
/// request, so that providers relying on verbatim history keep working.
#[derive(Clone, Debug)]
pub struct ModelResponse {
    /// The ordered output items produced by the model.
    pub output: Vec<OutputItem>,
    /// Token usage counters reported by the provider.
    pub usage: ModelUsage,
    /// The terminal status of the response.
    pub status: ModelStatus,
    /// Convenience concatenation of all message text in `output`.
    pub output_text: String,
}

impl ModelResponse {
    /// Returns the tool call requests contained in this response, in
    /// output order.
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCallRequest> {
        self.output.iter().filter_map(|item| match &item.kind {
            OutputKind::ToolCall(req) => Some(req),
            _ => None,
        })
    }
}

/// One output item from a model response.
#[derive(Clone, Debug)]
pub struct OutputItem {
    /// The provider-owned raw item, round-tripped verbatim into the
    /// next request.
    pub raw: OpaqueItem,
    /// What the agent can make of this item.
    pub kind: OutputKind,
}

/// The classification of an output item.
#[derive(Clone, Debug)]
pub enum OutputKind {
    /// An assistant message with its text content.
    Message(String),
    /// A tool call request.
    ToolCall(ToolCallRequest),
    /// Anything the agent doesn't need to interpret (reasoning items,
    /// provider extensions).
    Other,
}

/// Describes a tool call request from the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The serialized argument payload, as produced by the model.
    ///
    /// This is kept unparsed; deserialization happens at dispatch time
    /// so that a malformed payload surfaces where the call is handled.
    pub arguments: String,
}

/// The terminal status of a model response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelStatus {
    /// The model produced a complete response.
    #[default]
    Completed,
    /// The response was cut short (e.g. by an output token limit).
    Incomplete,
    /// The provider reported a failed generation.
    Failed,
}

/// Token usage counters for one request/response exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelUsage {
    /// Tokens consumed by the request.
    pub input_tokens: u64,
    /// Tokens generated by the model.
    pub output_tokens: u64,
    /// Total billed tokens.
    pub total_tokens: u64,
}
