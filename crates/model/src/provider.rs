use std::error::Error;

use crate::error::ErrorKind;
use crate::request::AskRequest;
use crate::response::Answer;

/// The error type for an answer provider.
///
/// The `Display` output is the raw error description meant for
/// diagnostics. It's never shown to the user as is.
pub trait AnswerProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents an answering service.
///
/// Once the provider is created, it should behave like a stateless object.
/// Every question is answered on its own, there is no conversation context
/// shared between requests.
pub trait AnswerProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: AnswerProviderError;

    /// Sends a question to the service.
    ///
    /// The returned future must be independent of `self`. Dropping it
    /// before completion should abort the underlying request, since this
    /// is how superseded requests get cancelled.
    fn ask(
        &self,
        req: &AskRequest,
    ) -> impl Future<Output = Result<Answer, Self::Error>> + Send + 'static;
}
