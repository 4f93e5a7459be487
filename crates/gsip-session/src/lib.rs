//! Dispatch boundary for decoded GSIP messages.
//!
//! A [`Session`] owns one link and one decoder, drains available bytes on
//! each [`Session::poll`], and hands every completed message to exactly
//! one registered handler, synchronously, inside the same call that
//! completed the frame. Handlers may return a reply message, which is
//! encoded and written back to the link before polling continues.
//!
//! Everything here is single-threaded and cooperative; a session instance
//! must not be polled from more than one thread at a time.

pub mod dispatch;
pub mod error;
pub mod session;

pub use dispatch::Dispatcher;
pub use error::{Result, SessionError};
pub use session::Session;
