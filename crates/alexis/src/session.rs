use std::time::Duration;

use alexis_core::transcript::TranscriptUpdate;
use alexis_core::{Chat, ChatBuilder, ChatClosedError, ChatSnapshot};
use alexis_http_model::{HttpAnswerProvider, HttpConfig, HttpConfigBuilder};
use alexis_model::AnswerProviderError;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    chat_builder: ChatBuilder,
}

impl SessionBuilder {
    /// Creates a session builder for the given answering service.
    pub fn with_config(config: HttpConfig) -> Self {
        debug!("using ask endpoint {}", config.ask_url());
        let provider = HttpAnswerProvider::new(config);
        let chat_builder = ChatBuilder::with_answer_provider(provider);
        Self { chat_builder }
    }

    /// Creates a session builder for the service at `server_url`, with the
    /// default ask path.
    #[inline]
    pub fn with_server_url<S: Into<String>>(server_url: S) -> Self {
        let config = HttpConfigBuilder::with_server_url(server_url).build();
        Self::with_config(config)
    }

    /// Sets the wait before retrying a transient failure.
    #[inline]
    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.chat_builder =
            self.chat_builder.with_retry_backoff(retry_backoff);
        self
    }

    /// Attaches a callback to be invoked after every transcript change.
    #[inline]
    pub fn on_update(
        mut self,
        on_update: impl Fn(TranscriptUpdate<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.chat_builder = self.chat_builder.on_update(on_update);
        self
    }

    /// Attaches a callback to be invoked when the busy flag flips.
    #[inline]
    pub fn on_busy_changed(
        mut self,
        on_busy_changed: impl Fn(bool) + Send + Sync + 'static,
    ) -> Self {
        self.chat_builder =
            self.chat_builder.on_busy_changed(on_busy_changed);
        self
    }

    /// Attaches a callback to be invoked when the input should be focused.
    #[inline]
    pub fn on_input_ready(
        mut self,
        on_input_ready: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.chat_builder =
            self.chat_builder.on_input_ready(on_input_ready);
        self
    }

    /// Attaches a diagnostics callback for failed exchanges.
    #[inline]
    pub fn on_failure(
        mut self,
        on_failure: impl Fn(&dyn AnswerProviderError)
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.chat_builder = self.chat_builder.on_failure(on_failure);
        self
    }

    /// Builds a new session. Must be called within a tokio runtime.
    pub fn build(self) -> Session {
        let chat = self.chat_builder.build();
        Session { chat }
    }
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session holds a chat wired to the HTTP answering service, and it is
/// basically a wrapper around [`Chat`].
pub struct Session {
    chat: Chat,
}

impl Session {
    /// Sends a message to the session.
    #[inline]
    pub fn send_message(&self, message: &str) -> Result<(), ChatClosedError> {
        self.chat.submit(message)
    }

    /// Returns a copy of the current chat state.
    #[inline]
    pub async fn snapshot(&self) -> Result<ChatSnapshot, ChatClosedError> {
        self.chat.snapshot().await
    }

    /// Returns the underlying chat.
    #[inline]
    pub fn chat(&self) -> &Chat {
        &self.chat
    }

    /// Closes the session, aborting the request in flight.
    #[inline]
    pub fn close(&self) {
        self.chat.close();
    }
}
