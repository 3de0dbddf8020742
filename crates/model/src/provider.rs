use std::error::Error;

use crate::error::ErrorKind;
use crate::request::ModelRequest;
use crate::response::ModelResponse;

/// The error type a model provider reports.
pub trait ModelProviderError: Error + Send + Sync + 'static {
    /// Classifies this error.
    fn kind(&self) -> ErrorKind;
}

/// A handle to one completion service.
///
/// Providers are stateless from the caller's point of view: each
/// request carries the whole conversation, and nothing a provider
/// remembers between calls may affect the outcome. Internal state
/// (connection pools, caches) is fine as long as dropping the provider
/// at any time stays harmless.
pub trait ModelProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ModelProviderError;

    /// Sends the request and resolves to the complete response.
    ///
    /// The returned future must not borrow `self`; it captures what it
    /// needs up front, so the caller may drop the provider while a
    /// request is still in flight.
    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static;
}
