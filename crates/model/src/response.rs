use serde::{Deserialize, Serialize};

/// A successful answer from the provider.
///
/// Providers only return an `Answer` when the text is non-empty; an empty
/// answer is reported as an [`crate::ErrorKind::EmptyAnswer`] error.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Answer {
    /// The answer text.
    pub text: String,
}

impl Answer {
    /// Creates an answer with the given text.
    #[inline]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}
