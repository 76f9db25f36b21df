//! Core logic of the chat widget: the transcript, the exchange with the
//! answering service, cancellation and retry.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod answer_client;
mod chat;
pub mod transcript;

pub use answer_client::DEFAULT_RETRY_BACKOFF;
pub use chat::{
    Chat, ChatBuilder, ChatClosedError, ChatSnapshot, DEFAULT_FAILURE_MESSAGE,
    DEFAULT_GREETING, DEFAULT_PLACEHOLDER, ExchangeStage,
};
