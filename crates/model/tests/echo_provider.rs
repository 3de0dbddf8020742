//! Implements the provider traits by hand to make sure they stay
//! implementable without macros or helper crates.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;

use codeloop_model::{
    ErrorKind, ModelMessage, ModelProvider, ModelProviderError, ModelRequest,
    ModelResponse, ModelStatus, ModelUsage, OpaqueItem, OutputItem, OutputKind,
};
use serde_json::json;

#[derive(Debug)]
struct EchoError(ErrorKind);

impl Display for EchoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for EchoError {}

impl ModelProviderError for EchoError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Replies to the most recent user message and errors on anything
/// else.
struct EchoProvider;

impl ModelProvider for EchoProvider {
    type Error = EchoError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let input = req.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.clone()),
            _ => None,
        });
        let result = match input {
            Some(input) => Ok(echo_response(&input)),
            None => Err(EchoError(ErrorKind::Other)),
        };
        ready(result)
    }
}

fn echo_response(input: &str) -> ModelResponse {
    let text = format!("You said {input}");
    let item = OutputItem {
        raw: OpaqueItem::new(
            "item:0",
            json!({ "type": "message", "text": text }),
        ),
        kind: OutputKind::Message(text.clone()),
    };
    ModelResponse {
        output: vec![item],
        usage: ModelUsage::default(),
        status: ModelStatus::Completed,
        output_text: text,
    }
}

#[tokio::test]
async fn test_completion() {
    let req = ModelRequest {
        messages: vec![
            ModelMessage::System("Echo things.".to_string()),
            ModelMessage::User("Good morning".to_string()),
        ],
        tools: vec![],
    };
    let resp = EchoProvider.send_request(&req).await.unwrap();

    assert_eq!(resp.output_text, "You said Good morning");
    assert_eq!(resp.status, ModelStatus::Completed);
    assert_eq!(resp.tool_calls().count(), 0);

    let raw = resp.output[0].raw.payload();
    assert_eq!(raw["text"], "You said Good morning");
}

#[tokio::test]
async fn test_error() {
    let req = ModelRequest {
        messages: vec![],
        tools: vec![],
    };
    let err = EchoProvider.send_request(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Other);
}
