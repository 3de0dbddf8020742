use std::collections::HashMap;

use codeloop_model::{ModelTool, ToolCallRequest, ToolCallResult};

use crate::tool::{Error, ToolObject};

/// A registry that resolves and runs tool call requests from the model.
pub struct Executor {
    tools: HashMap<String, Box<dyn ToolObject>>,
}

impl Executor {
    pub fn with_tools(tools: Vec<Box<dyn ToolObject>>) -> Self {
        let mut tool_map = HashMap::with_capacity(tools.len());
        for tool in tools {
            let name = tool.name();
            tool_map.insert(name.to_owned(), tool);
        }
        let tools = tool_map;
        Self { tools }
    }

    #[inline]
    pub fn definitions(&self) -> Vec<ModelTool> {
        self.tools
            .values()
            .map(|tool| ModelTool {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                parameters: tool.parameter_schema().clone(),
            })
            .collect()
    }

    /// Resolves one tool call request to its result.
    ///
    /// An unknown tool name, or an argument payload the tool cannot
    /// deserialize, fails the whole dispatch. Errors a tool reports
    /// through its own result string are not visible here.
    pub async fn dispatch(
        &self,
        req: &ToolCallRequest,
    ) -> Result<ToolCallResult, Error> {
        let Some(tool) = self.tools.get(&req.name) else {
            warn!("tool not found: {}", req.name);
            return Err(Error::unknown_tool().with_reason(req.name.clone()));
        };
        trace!("running a tool ({}) with args: {}", req.id, req.arguments);
        let content = tool.execute(&req.arguments).await?;
        Ok(ToolCallResult {
            id: req.id.clone(),
            content,
        })
    }
}
