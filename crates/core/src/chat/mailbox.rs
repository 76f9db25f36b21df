use std::error::Error;
use std::fmt::{self, Debug};

use tokio::sync::{mpsc, watch};

use super::Chat;
use super::state::ChatState;

/// A type of error which can be returned whenever messages are sent to
/// a chat that has been closed.
pub struct ChatClosedError;

impl Debug for ChatClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClosedError").finish()
    }
}

impl fmt::Display for ChatClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the chat has been closed")
    }
}

impl Error for ChatClosedError {}

/// Helper trait for handling boxed messages.
pub trait BoxMessage: Send + Debug + 'static {
    fn handle_box(self: Box<Self>, state: &mut ChatState, chat: &Chat);
}

/// A message that the chat loop handles with exclusive access to the
/// chat state.
pub trait Message: BoxMessage {
    fn handle(self, state: &mut ChatState, chat: &Chat);
}

impl<M: Message> BoxMessage for M {
    #[inline]
    fn handle_box(self: Box<Self>, state: &mut ChatState, chat: &Chat) {
        (*self).handle(state, chat)
    }
}

pub type BoxedMessage = Box<dyn BoxMessage>;

pub struct MailboxParts {
    pub mailbox: Mailbox,
    pub msg_rx: mpsc::UnboundedReceiver<BoxedMessage>,
    pub close_rx: watch::Receiver<bool>,
}

pub struct Mailbox {
    msg_tx: mpsc::UnboundedSender<BoxedMessage>,
    close_tx: watch::Sender<bool>,
}

impl Mailbox {
    #[inline]
    pub fn new() -> MailboxParts {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (close_tx, close_rx) = watch::channel(false);
        MailboxParts {
            mailbox: Mailbox { msg_tx, close_tx },
            msg_rx,
            close_rx,
        }
    }

    #[inline]
    pub fn send(&self, msg: BoxedMessage) -> Result<(), ChatClosedError> {
        if *self.close_tx.borrow() {
            return Err(ChatClosedError);
        }
        self.msg_tx.send(msg).map_err(|_| ChatClosedError)
    }

    #[inline]
    pub fn close(&self) {
        self.close_tx.send_replace(true);
    }
}
