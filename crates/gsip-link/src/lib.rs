//! Byte transports for GSIP.
//!
//! The protocol core never blocks on input: it drains whatever bytes the
//! link has buffered and keeps its partial decode state until the next
//! poll. [`ByteLink`] captures exactly that contract — a non-blocking
//! single-byte poll plus a write path.
//!
//! Two implementations are provided:
//! - [`TtyLink`] (unix): a serial device in raw mode at a fixed baud rate.
//! - [`LoopbackLink`]: an in-memory connected pair for tests and demos.

pub mod error;
pub mod link;
pub mod loopback;

#[cfg(unix)]
pub mod tty;

pub use error::{LinkError, Result};
pub use link::ByteLink;
pub use loopback::LoopbackLink;

#[cfg(unix)]
pub use tty::{LinkConfig, TtyLink};
