/// Classifies a provider failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request was rejected by a content filter.
    Moderated,
    /// The provider asked us to slow down.
    RateLimitExceeded,
    /// Everything else: transport, auth, malformed payloads.
    Other,
}
