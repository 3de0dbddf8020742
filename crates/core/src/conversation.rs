//! Conversation-related types.

use codeloop_model::ModelMessage;

/// Represents a conversation.
///
/// A conversation is append-only and owned by a single loop
/// invocation; it is not persisted anywhere once the invocation
/// returns.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    items: Vec<ModelMessage>,
}

impl Conversation {
    /// Appends a message to the conversation.
    #[inline]
    pub fn push(&mut self, msg: ModelMessage) {
        self.items.push(msg);
    }

    /// Returns the messages in this conversation, in insertion order.
    #[inline]
    pub fn messages(&self) -> &[ModelMessage] {
        &self.items
    }
}
