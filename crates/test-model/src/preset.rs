use std::time::Duration;

use alexis_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// How a preset reply settles.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    #[serde(rename = "answer")]
    Answer(String),
    #[serde(rename = "failure")]
    Failure(PresetFailure),
}

/// A failure to be returned by a preset reply.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetFailure {
    pub kind: ErrorKind,
    pub message: String,
}

/// The preset reply for one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetReply {
    /// The outcome of the request.
    pub outcome: PresetOutcome,
    /// If set, overrides the provider's delay for this reply.
    pub delay: Option<Duration>,
}

impl PresetReply {
    /// Creates a reply that answers with the given text.
    #[inline]
    pub fn answer<S: Into<String>>(text: S) -> Self {
        Self {
            outcome: PresetOutcome::Answer(text.into()),
            delay: None,
        }
    }

    /// Creates a reply that fails with the given kind and message.
    #[inline]
    pub fn failure<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            outcome: PresetOutcome::Failure(PresetFailure {
                kind,
                message: message.into(),
            }),
            delay: None,
        }
    }

    /// Shorthand for a `503 Service Unavailable` failure.
    #[inline]
    pub fn unavailable() -> Self {
        Self::failure(ErrorKind::ServiceUnavailable, "503 Service Unavailable")
    }

    /// Sets how long the reply takes to arrive.
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}
