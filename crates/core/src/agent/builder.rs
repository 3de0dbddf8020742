use codeloop_model::ModelProvider;

use super::{Agent, DEFAULT_MAX_TURNS};
use crate::model_client::ModelClient;
use crate::tool::{AnyTool, Tool, ToolObject};

/// Assembles an [`Agent`].
pub struct AgentBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) system_prompt: Option<String>,
    pub(crate) max_turns: u32,
    pub(crate) tools: Vec<Box<dyn ToolObject>>,
}

impl AgentBuilder {
    /// Starts a builder around the given model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            system_prompt: None,
            max_turns: DEFAULT_MAX_TURNS,
            tools: vec![],
        }
    }

    /// Sets the system instructions that lead every conversation.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Bounds the number of turns one [`Agent::run`] call may perform.
    #[inline]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Registers a tool under the name it reports.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        let tool = Box::new(AnyTool(tool));
        self.tools.push(tool);
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent {
        Agent::from_builder(self)
    }
}
