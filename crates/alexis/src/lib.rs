//! An out-of-the-box Alexis chat that talks to the answering service over
//! HTTP.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to embed the chat into your own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod session;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`alexis_core`] crate.
pub mod core {
    pub use alexis_core::*;
}
