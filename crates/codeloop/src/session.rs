use std::path::PathBuf;
use std::time::Duration;

use codeloop_core::{Agent, AgentBuilder, AgentError, AgentRunResult};
use codeloop_model::ModelProvider;

use crate::tools::PythonTool;

/// Assembles a [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder,
    python_tool: PythonTool,
}

impl SessionBuilder {
    /// Starts a builder around the given model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let agent_builder = AgentBuilder::with_model_provider(provider)
            .with_system_prompt(include_str!("./system_prompt.md"));
        Self {
            agent_builder,
            python_tool: PythonTool::new(),
        }
    }

    /// Overrides the system prompt for the agent.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.agent_builder = self.agent_builder.with_system_prompt(prompt);
        self
    }

    /// Bounds the number of turns one task may take.
    #[inline]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.agent_builder = self.agent_builder.with_max_turns(max_turns);
        self
    }

    /// Sets the wall-clock budget for each Python execution.
    #[inline]
    pub fn with_python_timeout(mut self, timeout: Duration) -> Self {
        self.python_tool = self.python_tool.with_timeout(timeout);
        self
    }

    /// Sets the Python interpreter the tool runs code with.
    #[inline]
    pub fn with_python_interpreter<P: Into<PathBuf>>(
        mut self,
        interpreter: P,
    ) -> Self {
        self.python_tool = self.python_tool.with_interpreter(interpreter);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        let agent = self.agent_builder.with_tool(self.python_tool).build();

        Session { agent }
    }
}

/// A single-task coding session.
///
/// The session is a thin wrapper around a fully wired [`Agent`]: the
/// Python tool is registered and the default system prompt applied, so
/// all that's left to provide is the task.
pub struct Session {
    agent: Agent,
}

impl Session {
    /// Runs the loop for one task and returns the outcome.
    #[inline]
    pub async fn run(
        &self,
        task: &str,
    ) -> Result<AgentRunResult, AgentError> {
        self.agent.run(task).await
    }
}

#[cfg(test)]
mod tests {
    use codeloop_model::{ModelMessage, ToolCallRequest};
    use codeloop_test_model::{PresetItem, PresetResponse, TestModelProvider};

    use super::*;

    #[tokio::test]
    async fn test_session_round_trip() {
        let mut provider = TestModelProvider::default();
        provider.push_response(PresetResponse::with_items([
            PresetItem::Message("Let me verify.".to_owned()),
            PresetItem::ToolCall(ToolCallRequest {
                id: "call:1".to_owned(),
                name: "run_python".to_owned(),
                arguments: "{\"code\": \"print(\\\"hello\\\")\"}".to_owned(),
            }),
        ]));
        provider.push_response(PresetResponse::with_items([
            PresetItem::Message("It printed hello.".to_owned()),
        ]));

        let session =
            SessionBuilder::with_model_provider(provider.clone()).build();
        let result = session.run("Say hello via Python").await.unwrap();
        assert_eq!(result.turns, 2);
        assert_eq!(result.response.output_text, "It printed hello.");

        let requests = provider.recorded_requests();
        assert_eq!(requests.len(), 2);

        // The default system prompt leads the conversation.
        let ModelMessage::System(prompt) = &requests[0].messages[0] else {
            panic!("expected the system prompt first");
        };
        assert!(prompt.contains("Python coding agent"));

        // The tool result that reached the model is the program output.
        let Some(ModelMessage::Tool(tool_result)) =
            requests[1].messages.last()
        else {
            panic!("expected a tool result");
        };
        assert_eq!(tool_result.id, "call:1");
        assert_eq!(tool_result.content, "hello\n");
    }
}
