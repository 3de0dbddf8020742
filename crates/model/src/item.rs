use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde_json::Value;

/// A provider-owned output item that doesn't need to be processed by
/// the agent.
///
/// Providers usually require their own output items (reasoning items,
/// raw assistant messages, tool call items) to be echoed back verbatim
/// in the next request, and the exact wire shape of those items is
/// owned by the provider. The conversation therefore carries such items
/// as raw JSON, keyed by the provider-assigned identifier, and the
/// provider serializes the payload back into the request untouched.
///
/// The payload is shared: the conversation is re-sent in full on every
/// turn, so cloning an item must not copy its JSON tree.
pub struct OpaqueItem(Arc<Inner>);

struct Inner {
    id: String,
    payload: Value,
}

impl OpaqueItem {
    /// Creates a new `OpaqueItem` from the provider's raw JSON item.
    ///
    /// The `id` identifies the item and should be unique across the
    /// conversation. Comparing `OpaqueItem` is just trivially comparing
    /// the `id`.
    #[inline]
    pub fn new<ID: Into<String>>(id: ID, payload: Value) -> Self {
        let id = id.into();
        Self(Arc::new(Inner { id, payload }))
    }

    /// Returns the identifier of this item.
    #[inline]
    pub fn id(&self) -> &str {
        &self.0.id
    }

    /// Returns the raw JSON payload, exactly as the provider produced
    /// it.
    #[inline]
    pub fn payload(&self) -> &Value {
        &self.0.payload
    }
}

impl Clone for OpaqueItem {
    #[inline]
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl Debug for OpaqueItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueItem")
            .field("id", &self.0.id)
            .finish_non_exhaustive()
    }
}

impl PartialEq for OpaqueItem {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for OpaqueItem {}

impl Hash for OpaqueItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_payload_round_trip() {
        let raw = json!({
            "type": "reasoning",
            "id": "rs_1",
            "summary": []
        });
        let item = OpaqueItem::new("rs_1", raw.clone());
        assert_eq!(item.id(), "rs_1");
        assert_eq!(*item.payload(), raw);
    }

    #[test]
    fn test_identity_is_the_id() {
        let call = OpaqueItem::new(
            "fc_1",
            json!({ "type": "function_call", "name": "run_python" }),
        );
        let same_id =
            OpaqueItem::new("fc_1", json!({ "type": "message" }));
        let other = OpaqueItem::new(
            "fc_2",
            json!({ "type": "function_call", "name": "run_python" }),
        );

        assert_eq!(call, same_id);
        assert_ne!(call, other);

        let mut dedup = HashSet::new();
        dedup.insert(call.clone());
        dedup.insert(same_id);
        dedup.insert(other);
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_clone_shares_the_payload() {
        let item = OpaqueItem::new("msg_1", json!({ "type": "message" }));
        let clone = item.clone();
        assert!(std::ptr::eq(item.payload(), clone.payload()));
    }
}
