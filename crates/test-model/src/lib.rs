//! A scripted model provider for tests.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use codeloop_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
    ModelStatus, ModelUsage, OpaqueItem, OutputItem, OutputKind,
};
use serde_json::json;
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct ScriptState {
    responses: VecDeque<PresetResponse>,
    recorded_requests: Vec<ModelRequest>,
    attempts_on_head: u64,
    requests_served: u64,
}

/// A model provider that replays a script instead of talking to a
/// service.
///
/// Push the responses the "model" should produce before handing the
/// provider to the loop under test. Responses are consumed in FIFO
/// order, one per request; a request past the end of the script is
/// answered with an error.
///
/// Clones share the script, so a clone can be handed to the agent
/// while the original is kept around for assertions.
///
/// # Note
///
/// Requests are recorded by value and responses are cloned liberally.
/// Keep this type out of anything performance-sensitive.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<ScriptState>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    /// Appends a preset response to the script.
    #[inline]
    pub fn push_response(&mut self, preset: PresetResponse) {
        if let Ok(mut script) = self.script.lock() {
            script.responses.push_back(preset);
        }
    }

    /// Sets an artificial delay before each response resolves.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns how many requests this provider has received so far,
    /// counting failed attempts.
    #[inline]
    pub fn request_count(&self) -> u64 {
        self.script
            .lock()
            .map(|script| script.requests_served)
            .unwrap_or(0)
    }

    /// Returns copies of every request this provider has received, in
    /// arrival order.
    #[inline]
    pub fn recorded_requests(&self) -> Vec<ModelRequest> {
        self.script
            .lock()
            .map(|script| script.recorded_requests.clone())
            .unwrap_or_default()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let script = Arc::clone(&self.script);
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        let req = req.clone();
        async move {
            sleep(delay).await;

            let Ok(mut script) = script.lock() else {
                return Err(Error {
                    message: "script state is poisoned",
                    kind: ErrorKind::Other,
                });
            };
            script.requests_served += 1;
            script.recorded_requests.push(req);

            let Some(preset) = script.responses.pop_front() else {
                return Err(Error {
                    message: "no more scripted responses",
                    kind: ErrorKind::RateLimitExceeded,
                });
            };

            let fail = match preset.failures {
                Some(0) => true,
                Some(n) => script.attempts_on_head < n,
                None => false,
            };
            if fail {
                script.attempts_on_head += 1;
                script.responses.push_front(preset);
                return Err(Error {
                    message: "scripted failure",
                    kind: ErrorKind::Other,
                });
            }

            let serial = script.requests_served;
            script.attempts_on_head = 0;

            Ok(make_response(preset, serial))
        }
    }
}

fn make_response(preset: PresetResponse, serial: u64) -> ModelResponse {
    let mut output = Vec::with_capacity(preset.items.len());
    let mut output_text = String::new();

    for (idx, item) in preset.items.into_iter().enumerate() {
        let id = format!("item:{serial}:{idx}");
        let (raw, kind) = match item {
            PresetItem::Message(text) => {
                output_text.push_str(&text);
                let payload = json!({ "type": "message", "text": text });
                (OpaqueItem::new(id, payload), OutputKind::Message(text))
            }
            PresetItem::ToolCall(req) => {
                let payload = json!({
                    "type": "tool_call",
                    "call_id": req.id,
                    "name": req.name,
                    "arguments": req.arguments,
                });
                (OpaqueItem::new(id, payload), OutputKind::ToolCall(req))
            }
        };
        output.push(OutputItem { raw, kind });
    }

    ModelResponse {
        output,
        usage: ModelUsage::default(),
        status: ModelStatus::Completed,
        output_text,
    }
}
