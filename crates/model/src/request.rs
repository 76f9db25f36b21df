use serde::{Deserialize, Serialize};

/// A question to be sent to the answer provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question text, already trimmed.
    pub question: String,
}

impl AskRequest {
    /// Creates a request for the given question.
    #[inline]
    pub fn new<S: Into<String>>(question: S) -> Self {
        Self {
            question: question.into(),
        }
    }
}
