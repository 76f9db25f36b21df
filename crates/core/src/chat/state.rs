use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::Chat;
use super::builder::{Callbacks, ChatTexts};
use super::mailbox::Message;
use crate::answer_client::{AnswerClient, FetchResult};
use crate::transcript::{
    Message as ChatMessage, Transcript, TranscriptChange, TranscriptUpdate,
};

/// The stage of the live exchange.
///
/// Settling happens within a single message, so it's never observable.
/// Superseded exchanges are cancelled and don't have a stage at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExchangeStage {
    /// No exchange is live.
    #[default]
    Idle,
    /// The first request is in flight.
    Sending,
    /// The first request failed transiently, the retry is pending or in
    /// flight.
    Retrying,
}

/// A point-in-time copy of the chat, for read-only display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatSnapshot {
    /// All messages in display order.
    pub messages: Vec<ChatMessage>,
    /// Whether an exchange is live.
    pub busy: bool,
    /// The text in the input box.
    pub draft: String,
    /// The stage of the live exchange.
    pub stage: ExchangeStage,
}

impl ChatSnapshot {
    /// Returns `true` if the send button should be enabled.
    #[inline]
    pub fn can_send(&self) -> bool {
        !self.busy && !self.draft.trim().is_empty()
    }
}

/// The handle of the outstanding request.
struct InFlight {
    generation: u64,
    task: JoinHandle<()>,
}

/// The state owned by the chat loop.
pub struct ChatState {
    client: AnswerClient,
    transcript: Transcript,
    texts: ChatTexts,
    callbacks: Callbacks,
    busy: bool,
    draft: String,
    stage: ExchangeStage,
    // Bumped for every accepted submission; only the outcome tagged with
    // the current value may touch the transcript.
    generation: u64,
    in_flight: Option<InFlight>,
}

impl ChatState {
    pub fn new(
        client: AnswerClient,
        texts: ChatTexts,
        callbacks: Callbacks,
    ) -> Self {
        Self {
            client,
            transcript: Transcript::with_greeting(texts.greeting.clone()),
            texts,
            callbacks,
            busy: false,
            draft: String::new(),
            stage: ExchangeStage::Idle,
            generation: 0,
            in_flight: None,
        }
    }

    fn mount(&mut self) {
        self.notify_update(TranscriptChange::Appended { index: 0 });
        self.notify_input_ready();
    }

    /// Starts an exchange for `question`. Returns `false` if the question
    /// was rejected.
    fn submit(
        &mut self,
        question: &str,
        supersede: bool,
        chat: &Chat,
    ) -> bool {
        let question = question.trim();
        if question.is_empty() {
            debug!("ignoring empty question");
            return false;
        }
        if self.busy {
            if !supersede {
                debug!("busy, ignoring question");
                return false;
            }
            self.cancel_in_flight();
        }
        self.begin_exchange(question.to_owned(), chat);
        true
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(
                generation = in_flight.generation,
                "superseding the outstanding request"
            );
            // The task may still be running; it's not awaited.
            in_flight.task.abort();
        }
        self.stage = ExchangeStage::Idle;
        self.set_busy(false);
    }

    fn begin_exchange(&mut self, question: String, chat: &Chat) {
        self.generation += 1;
        let generation = self.generation;
        self.set_busy(true);

        let change = self.transcript.append(ChatMessage::user(&question));
        self.notify_update(change);
        let change = self
            .transcript
            .reserve_placeholder(self.texts.placeholder.clone());
        self.notify_update(change);
        self.stage = ExchangeStage::Sending;

        let client = self.client.clone();
        let chat = chat.clone();
        let task = tokio::spawn(
            async move {
                let retry_chat = chat.clone();
                let result = client
                    .fetch(question, move |err, delay| {
                        warn!("retrying in {delay:?} after: {err}");
                        retry_chat.send(RetryScheduled { generation }).ok();
                    })
                    .await;
                chat.send(ExchangeSettled { generation, result }).ok();
            }
            .instrument(debug_span!("exchange", generation)),
        );
        self.in_flight = Some(InFlight { generation, task });
    }

    #[inline]
    fn is_live(&self, generation: u64) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.generation == generation)
    }

    fn retry_scheduled(&mut self, generation: u64) {
        if !self.is_live(generation) {
            return;
        }
        self.stage = ExchangeStage::Retrying;
    }

    fn settle(&mut self, generation: u64, result: FetchResult) {
        if !self.is_live(generation) {
            debug!(generation, "discarding the outcome of a stale request");
            return;
        }
        // The task is about to finish on its own.
        self.in_flight = None;

        let text = match result {
            Ok(answer) => answer.text,
            Err(err) => {
                error!(
                    generation,
                    kind = ?err.kind(),
                    "failed to fetch the answer: {err}"
                );
                if let Some(on_failure) = &self.callbacks.on_failure {
                    on_failure(&*err);
                }
                self.texts.failure.clone()
            }
        };
        let change = self.transcript.settle_placeholder(text);
        self.notify_update(change);

        self.stage = ExchangeStage::Idle;
        self.set_busy(false);
        self.notify_input_ready();
    }

    fn set_draft(&mut self, draft: String) {
        self.draft = draft;
    }

    fn send_draft(&mut self, chat: &Chat) {
        let draft = std::mem::take(&mut self.draft);
        if !self.submit(&draft, false, chat) {
            // Rejected, so the input box keeps its text.
            self.draft = draft;
        }
    }

    fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            messages: self.transcript.messages().to_vec(),
            busy: self.busy,
            draft: self.draft.clone(),
            stage: self.stage,
        }
    }

    fn set_busy(&mut self, busy: bool) {
        if self.busy == busy {
            return;
        }
        self.busy = busy;
        if let Some(on_busy_changed) = &self.callbacks.on_busy_changed {
            on_busy_changed(busy);
        }
    }

    fn notify_update(&self, change: TranscriptChange) {
        if let Some(on_update) = &self.callbacks.on_update {
            on_update(TranscriptUpdate {
                messages: self.transcript.messages(),
                change,
            });
        }
    }

    fn notify_input_ready(&self) {
        if let Some(on_input_ready) = &self.callbacks.on_input_ready {
            on_input_ready();
        }
    }
}

impl Drop for ChatState {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.task.abort();
        }
    }
}

#[derive(Debug)]
pub struct Mounted;

impl Message for Mounted {
    #[inline]
    fn handle(self, state: &mut ChatState, _chat: &Chat) {
        state.mount();
    }
}

#[derive(Debug)]
pub struct Submit {
    pub question: String,
    pub supersede: bool,
}

impl Message for Submit {
    #[inline]
    fn handle(self, state: &mut ChatState, chat: &Chat) {
        state.submit(&self.question, self.supersede, chat);
    }
}

#[derive(Debug)]
pub struct SetDraft(pub String);

impl Message for SetDraft {
    #[inline]
    fn handle(self, state: &mut ChatState, _chat: &Chat) {
        state.set_draft(self.0);
    }
}

#[derive(Debug)]
pub struct SendDraft;

impl Message for SendDraft {
    #[inline]
    fn handle(self, state: &mut ChatState, chat: &Chat) {
        state.send_draft(chat);
    }
}

#[derive(Debug)]
pub struct TakeSnapshot(pub oneshot::Sender<ChatSnapshot>);

impl Message for TakeSnapshot {
    #[inline]
    fn handle(self, state: &mut ChatState, _chat: &Chat) {
        self.0.send(state.snapshot()).ok();
    }
}

#[derive(Debug)]
struct RetryScheduled {
    generation: u64,
}

impl Message for RetryScheduled {
    #[inline]
    fn handle(self, state: &mut ChatState, _chat: &Chat) {
        state.retry_scheduled(self.generation);
    }
}

#[derive(Debug)]
pub struct ExchangeSettled {
    pub generation: u64,
    pub result: FetchResult,
}

impl Message for ExchangeSettled {
    #[inline]
    fn handle(self, state: &mut ChatState, _chat: &Chat) {
        state.settle(self.generation, self.result);
    }
}
