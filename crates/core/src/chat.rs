mod builder;
mod mailbox;
mod scheduler;
mod state;

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::Instrument;

pub use builder::{
    ChatBuilder, DEFAULT_FAILURE_MESSAGE, DEFAULT_GREETING, DEFAULT_PLACEHOLDER,
};
pub use mailbox::ChatClosedError;
use mailbox::{Mailbox, MailboxParts, Message};
use scheduler::run_chat;
pub use state::{ChatSnapshot, ExchangeStage};
use state::{ChatState, Mounted, SendDraft, SetDraft, Submit, TakeSnapshot};

/// A chat widget, which maintains the transcript and the exchange with the
/// answering service.
///
/// The widget runs as a loop on its own task, and this type is a cheap
/// handle to it. Every method only enqueues a message, so the calls return
/// immediately and take effect in order; changes are reported through the
/// callbacks registered on [`ChatBuilder`].
///
/// At most one exchange is live. A question submitted with [`Chat::submit`]
/// while busy is ignored, while [`Chat::supersede`] cancels the live
/// exchange instead. A cancelled exchange never touches the transcript
/// again, even if its response arrives later.
#[derive(Clone)]
pub struct Chat {
    mailbox: Arc<Mailbox>,
}

impl Chat {
    /// Submits a question.
    ///
    /// The question is trimmed, and ignored if it's empty or an exchange
    /// is still live.
    #[inline]
    pub fn submit<S: Into<String>>(
        &self,
        question: S,
    ) -> Result<(), ChatClosedError> {
        self.send(Submit {
            question: question.into(),
            supersede: false,
        })
    }

    /// Submits a question, cancelling the live exchange if there is one.
    ///
    /// The cancelled exchange keeps its placeholder as is.
    #[inline]
    pub fn supersede<S: Into<String>>(
        &self,
        question: S,
    ) -> Result<(), ChatClosedError> {
        self.send(Submit {
            question: question.into(),
            supersede: true,
        })
    }

    /// Replaces the text in the input box.
    #[inline]
    pub fn set_draft<S: Into<String>>(
        &self,
        draft: S,
    ) -> Result<(), ChatClosedError> {
        self.send(SetDraft(draft.into()))
    }

    /// Submits the text in the input box, and clears it if accepted.
    #[inline]
    pub fn send_draft(&self) -> Result<(), ChatClosedError> {
        self.send(SendDraft)
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> Result<ChatSnapshot, ChatClosedError> {
        let (tx, rx) = oneshot::channel();
        self.send(TakeSnapshot(tx))?;
        rx.await.map_err(|_| ChatClosedError)
    }

    /// Closes the chat.
    ///
    /// The loop stops handling further messages and the request in flight
    /// is aborted. No callbacks are invoked after the loop has stopped.
    #[inline]
    pub fn close(&self) {
        self.mailbox.close();
    }
}

impl Chat {
    fn spawn_from_builder(builder: ChatBuilder) -> Self {
        let ChatBuilder {
            client,
            retry_backoff,
            texts,
            callbacks,
        } = builder;

        let client = client.with_retry_backoff(retry_backoff);
        let state = ChatState::new(client, texts, callbacks);
        let chat = Self::spawn(state);
        chat.send(Mounted).ok();
        chat
    }

    fn spawn(state: ChatState) -> Self {
        let MailboxParts {
            mailbox,
            msg_rx,
            close_rx,
        } = Mailbox::new();
        let mailbox = Arc::new(mailbox);
        tokio::spawn(
            run_chat(Arc::downgrade(&mailbox), state, msg_rx, close_rx)
                .instrument(debug_span!("chat")),
        );
        Self { mailbox }
    }

    #[inline]
    fn from_mailbox(mailbox: Arc<Mailbox>) -> Self {
        Self { mailbox }
    }

    #[inline]
    fn send<M: Message>(&self, msg: M) -> Result<(), ChatClosedError> {
        self.mailbox.send(Box::new(msg))
    }
}
