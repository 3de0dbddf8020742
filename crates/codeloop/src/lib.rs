//! An out-of-the-box coding agent that pairs a model provider with a
//! Python code-execution tool.
//!
//! Run the bundled binary from a terminal, or embed [`Session`] as a
//! library to drive the loop from your own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod session;
pub mod tools;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`codeloop_core`] crate.
pub mod core {
    pub use codeloop_core::*;
}
