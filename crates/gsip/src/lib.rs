//! GSIP — the GPSDO Serial Interface Protocol.
//!
//! GSIP carries commands and telemetry between a host and an embedded
//! oscillator-control device over a byte-oriented serial link. This crate
//! re-exports the workspace layers under one roof:
//!
//! - [`wire`] — frame decoder/encoder, CRC7, and the message model
//! - [`link`] — non-blocking byte transports (serial tty, loopback)
//! - [`session`] — typed dispatch and the poll-driven session loop

/// Re-export wire types.
pub mod wire {
    pub use gsip_wire::*;
}

/// Re-export link types.
pub mod link {
    pub use gsip_link::*;
}

/// Re-export session types.
pub mod session {
    pub use gsip_session::*;
}
