use std::sync::Weak;

use tokio::select;
use tokio::sync::{mpsc, watch};

use super::Chat;
use super::mailbox::{BoxedMessage, Mailbox};
use super::state::ChatState;

/// Runs the chat loop until the chat is closed or every handle is gone.
///
/// This is the only place where `ChatState` is touched, messages are
/// handled one at a time in the order they were sent.
pub async fn run_chat(
    mailbox: Weak<Mailbox>,
    mut state: ChatState,
    mut msg_rx: mpsc::UnboundedReceiver<BoxedMessage>,
    mut close_rx: watch::Receiver<bool>,
) {
    debug!("started");
    loop {
        let msg = select! {
            biased;

            _ = close_rx.changed() => {
                break;
            }
            msg = msg_rx.recv() => {
                let Some(msg) = msg else {
                    break;
                };
                msg
            }
        };
        trace!("received message: {msg:?}");

        let Some(mailbox) = mailbox.upgrade() else {
            warn!("last mailbox has been dropped, discard the message");
            break;
        };

        let proc_span = trace_span!("proc msg");
        proc_span.in_scope(|| {
            msg.handle_box(&mut state, &Chat::from_mailbox(mailbox));
            trace!("finished");
        });
    }
    // Dropping the state aborts the request in flight.
    debug!("will terminate");
}
