mod builder;

use std::error::Error as StdError;
use std::fmt::{self, Display};

use codeloop_model::{
    ModelMessage, ModelProviderError, ModelRequest, ModelResponse,
};
use tracing::Instrument;

use crate::conversation::Conversation;
use crate::model_client::ModelClient;
use crate::tool::{self, Executor as ToolExecutor};
pub use builder::AgentBuilder;

/// The default turn budget for one [`Agent::run`] call.
pub const DEFAULT_MAX_TURNS: u32 = 10;

const PREVIEW_LEN: usize = 80;

/// The error type for a failed [`Agent::run`] call.
///
/// The loop performs no recovery of its own: the first provider error
/// or undispatchable tool call aborts the whole call.
#[derive(Debug)]
pub enum AgentError {
    /// The model provider returned an error.
    Model(Box<dyn ModelProviderError>),
    /// A tool call could not be dispatched, either because the tool is
    /// not registered or because its argument payload was malformed.
    Tool(tool::Error),
}

impl Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Model(err) => {
                write!(f, "model provider error: {err}")
            }
            AgentError::Tool(err) => write!(f, "tool dispatch error: {err}"),
        }
    }
}

impl StdError for AgentError {}

/// The outcome of a completed [`Agent::run`] call.
#[derive(Debug)]
pub struct AgentRunResult {
    /// The last response received from the model.
    ///
    /// When the run ends by turn budget exhaustion, this response may
    /// still contain tool calls; their results were appended to the
    /// conversation, but no further request was sent.
    pub response: ModelResponse,
    /// How many turns the run performed.
    pub turns: u32,
}

/// An agent that drives a model through bounded request/response turns,
/// resolving the tool calls of each turn before the next one.
///
/// An agent holds no conversational state between [`run`](Agent::run)
/// calls; each call owns its conversation from start to finish.
pub struct Agent {
    model_client: ModelClient,
    tool_executor: ToolExecutor,
    system_prompt: Option<String>,
    max_turns: u32,
}

impl Agent {
    fn from_builder(builder: AgentBuilder) -> Self {
        let AgentBuilder {
            model_client,
            system_prompt,
            max_turns,
            tools,
        } = builder;
        Self {
            model_client,
            tool_executor: ToolExecutor::with_tools(tools),
            system_prompt,
            max_turns,
        }
    }

    /// Runs one full loop invocation for the given task.
    ///
    /// Each turn sends the accumulated conversation together with the
    /// registered tool definitions, appends every output item the model
    /// produced, and resolves the tool calls among them in list order.
    /// The call returns the response of the turn in which the model
    /// requested no tools, or the response of the final turn once the
    /// turn budget is exhausted.
    pub async fn run(&self, task: &str) -> Result<AgentRunResult, AgentError> {
        let mut conversation = Conversation::default();
        if let Some(prompt) = &self.system_prompt {
            conversation.push(ModelMessage::System(prompt.clone()));
        }
        conversation.push(ModelMessage::User(task.to_owned()));

        let tools = self.tool_executor.definitions();

        let mut turn: u32 = 0;
        loop {
            debug!(turn, "starting a turn");
            turn += 1;

            let request = ModelRequest {
                messages: conversation.messages().to_vec(),
                tools: tools.clone(),
            };
            let response = self
                .model_client
                .send_request(request)
                .await
                .map_err(AgentError::Model)?;

            for item in &response.output {
                conversation.push(ModelMessage::Opaque(item.raw.clone()));
            }

            let tool_calls: Vec<_> = response.tool_calls().cloned().collect();
            if tool_calls.is_empty() {
                debug!(turn, "model produced a final answer");
                return Ok(AgentRunResult { response, turns: turn });
            }

            // Every request gets its result appended before anything
            // else happens, including on the final turn.
            for req in &tool_calls {
                debug!(
                    tool = %req.name,
                    args = %preview(&req.arguments),
                    "resolving a tool call"
                );
                let result = self
                    .tool_executor
                    .dispatch(req)
                    .instrument(debug_span!("tool execute"))
                    .await
                    .map_err(AgentError::Tool)?;
                trace!(
                    result = %preview(&result.content),
                    "tool call resolved"
                );
                conversation.push(ModelMessage::Tool(result));
            }

            if turn >= self.max_turns {
                warn!(turn, "turn budget exhausted, returning early");
                return Ok(AgentRunResult { response, turns: turn });
            }
        }
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let mut preview: String = chars.by_ref().take(PREVIEW_LEN).collect();
    if chars.next().is_some() {
        preview.push_str("...");
    }
    preview
}
