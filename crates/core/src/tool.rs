//! The tool surface: the trait tools implement and the dispatch
//! machinery the loop resolves tool calls through.

mod error;
mod executor;

use std::pin::Pin;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use error::{Error, ErrorKind};
pub(crate) use executor::Executor;

/// What a tool resolves to: its output text, or the error that kept it
/// from being dispatched.
pub type ToolResult = Result<String, Error>;

/// A capability the model can invoke by name.
///
/// Tools carry no mutable state. Whatever context an execution needs
/// (an interpreter path, a timeout) is fixed when the tool is
/// constructed and copied into the future it returns.
pub trait Tool: Send + Sync + 'static {
    /// The deserialized argument type the tool accepts.
    type Input: DeserializeOwned;

    /// The name the model calls this tool by.
    fn name(&self) -> &str;

    /// A description the model reads to decide when to use the tool.
    fn description(&self) -> &str;

    /// The JSON schema of the tool's arguments.
    fn parameter_schema(&self) -> &Value;

    /// Runs the tool.
    ///
    /// The returned future must not borrow `self`, and it should be
    /// cancellation safe.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static;
}

pub(crate) trait ToolObject: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameter_schema(&self) -> &Value;

    fn execute(
        &self,
        arguments: &str,
    ) -> Pin<Box<dyn Future<Output = ToolResult> + Send>>;
}

pub(crate) struct AnyTool<T: Tool>(pub T);

impl<T: Tool> ToolObject for AnyTool<T> {
    #[inline]
    fn name(&self) -> &str {
        self.0.name()
    }

    #[inline]
    fn description(&self) -> &str {
        self.0.description()
    }

    #[inline]
    fn parameter_schema(&self) -> &Value {
        self.0.parameter_schema()
    }

    #[inline]
    fn execute(
        &self,
        arguments: &str,
    ) -> Pin<Box<dyn Future<Output = ToolResult> + Send>> {
        // The model sends arguments as a serialized payload; they stay
        // unparsed until this point so that a malformed payload fails
        // the dispatch, not the turn that produced it.
        let input: T::Input = match serde_json::from_str(arguments) {
            Ok(input) => input,
            Err(err) => {
                let reason = format!("{err}");
                return Box::pin(std::future::ready(ToolResult::Err(
                    Error::invalid_input().with_reason(reason),
                )));
            }
        };
        Box::pin(self.0.execute(input))
    }
}
