//! An abstraction layer for the services that answer user questions.
//!
//! This crate establishes the protocol between the chat widget and the
//! remote answering service, so that the widget can talk to a real HTTP
//! endpoint or a scripted fake without modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
