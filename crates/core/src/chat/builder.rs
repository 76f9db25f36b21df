use std::time::Duration;

use alexis_model::{AnswerProvider, AnswerProviderError};

use super::Chat;
use crate::answer_client::{AnswerClient, DEFAULT_RETRY_BACKOFF};
use crate::transcript::TranscriptUpdate;

/// The greeting every transcript starts with.
pub const DEFAULT_GREETING: &str =
    "Hi! I'm Alexis. How can I help you with your course today?";

/// The text of the placeholder shown while an answer is pending.
pub const DEFAULT_PLACEHOLDER: &str = "Thinking…";

/// The text shown in place of the answer when fetching fails.
pub const DEFAULT_FAILURE_MESSAGE: &str =
    "Sorry, something went wrong. Please try again later.";

type UpdateFn = Box<dyn Fn(TranscriptUpdate<'_>) + Send + Sync>;
type BusyChangedFn = Box<dyn Fn(bool) + Send + Sync>;
type InputReadyFn = Box<dyn Fn() + Send + Sync>;
type FailureFn = Box<dyn Fn(&dyn AnswerProviderError) + Send + Sync>;

#[derive(Default)]
pub struct Callbacks {
    pub on_update: Option<UpdateFn>,
    pub on_busy_changed: Option<BusyChangedFn>,
    pub on_input_ready: Option<InputReadyFn>,
    pub on_failure: Option<FailureFn>,
}

#[derive(Clone, Debug)]
pub struct ChatTexts {
    pub greeting: String,
    pub placeholder: String,
    pub failure: String,
}

impl Default for ChatTexts {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_owned(),
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            failure: DEFAULT_FAILURE_MESSAGE.to_owned(),
        }
    }
}

/// [`Chat`] builder.
pub struct ChatBuilder {
    pub(crate) client: AnswerClient,
    pub(crate) retry_backoff: Duration,
    pub(crate) texts: ChatTexts,
    pub(crate) callbacks: Callbacks,
}

impl ChatBuilder {
    /// Creates a new builder with the specified answer provider.
    #[inline]
    pub fn with_answer_provider<P: AnswerProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            client: AnswerClient::new(provider),
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            texts: Default::default(),
            callbacks: Default::default(),
        }
    }

    /// Sets the greeting that seeds the transcript.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.texts.greeting = greeting.into();
        self
    }

    /// Sets the placeholder text shown while waiting for an answer.
    #[inline]
    pub fn with_placeholder<S: Into<String>>(
        mut self,
        placeholder: S,
    ) -> Self {
        self.texts.placeholder = placeholder.into();
        self
    }

    /// Sets the text shown when an answer can't be fetched.
    #[inline]
    pub fn with_failure_message<S: Into<String>>(
        mut self,
        message: S,
    ) -> Self {
        self.texts.failure = message.into();
        self
    }

    /// Sets the wait before retrying a transient failure.
    #[inline]
    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Attaches a callback to be invoked after every transcript change.
    ///
    /// Views should re-render and scroll to the bottom here.
    #[inline]
    pub fn on_update(
        mut self,
        on_update: impl Fn(TranscriptUpdate<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_update = Some(Box::new(on_update));
        self
    }

    /// Attaches a callback to be invoked when the busy flag flips.
    #[inline]
    pub fn on_busy_changed(
        mut self,
        on_busy_changed: impl Fn(bool) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_busy_changed = Some(Box::new(on_busy_changed));
        self
    }

    /// Attaches a callback to be invoked when the input box should get the
    /// focus back: once mounted, and after every settled exchange.
    #[inline]
    pub fn on_input_ready(
        mut self,
        on_input_ready: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_input_ready = Some(Box::new(on_input_ready));
        self
    }

    /// Attaches a diagnostics callback which receives the raw error of
    /// every failed exchange.
    #[inline]
    pub fn on_failure(
        mut self,
        on_failure: impl Fn(&dyn AnswerProviderError)
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.callbacks.on_failure = Some(Box::new(on_failure));
        self
    }

    /// Builds the chat and starts its loop.
    ///
    /// Must be called within a tokio runtime.
    #[inline]
    pub fn build(self) -> Chat {
        Chat::spawn_from_builder(self)
    }
}
