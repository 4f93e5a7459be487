//! Poll-driven pump: link bytes in, handled messages and replies out.

use bytes::BytesMut;
use gsip_link::ByteLink;
use gsip_wire::{encode_message, DecoderStats, FrameDecoder, Message};
use tracing::trace;

use crate::dispatch::Dispatcher;
use crate::error::Result;

/// One GSIP link endpoint: link + decoder + dispatcher.
///
/// Decoder state is private to the session; concurrent links each get
/// their own session instance.
pub struct Session<L> {
    link: L,
    decoder: FrameDecoder,
    dispatcher: Dispatcher,
    encode_buf: BytesMut,
}

impl<L: ByteLink> Session<L> {
    /// Create a session over a link with an empty dispatcher.
    pub fn new(link: L) -> Self {
        Self::with_dispatcher(link, Dispatcher::new())
    }

    /// Create a session with a pre-populated dispatcher.
    pub fn with_dispatcher(link: L, dispatcher: Dispatcher) -> Self {
        Self {
            link,
            decoder: FrameDecoder::new(),
            dispatcher,
            encode_buf: BytesMut::with_capacity(128),
        }
    }

    /// Access the dispatcher to bind handlers.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Decoder drop/delivery counters for this session.
    pub fn stats(&self) -> DecoderStats {
        self.decoder.stats()
    }

    /// Drain every byte the link has buffered, without blocking.
    ///
    /// Each completed message is delivered to the dispatcher inside this
    /// call; handler replies are encoded and written back to the link
    /// before polling continues. Returns the number of messages delivered.
    /// If no complete frame is available the decoder simply keeps its
    /// partial state for the next poll.
    pub fn poll(&mut self) -> Result<usize> {
        let mut delivered = 0usize;
        while let Some(byte) = self.link.poll_byte()? {
            let Some(msg) = self.decoder.feed(byte) else {
                continue;
            };
            trace!(
                class = ?msg.class,
                operation = msg.operation,
                name = msg.operation_name(),
                "message received"
            );
            delivered += 1;
            if let Some(reply) = self.dispatcher.dispatch(&msg) {
                self.send(&reply)?;
            }
        }
        Ok(delivered)
    }

    /// Encode and write one unsolicited outbound message.
    pub fn send(&mut self, msg: &Message) -> Result<()> {
        self.encode_buf.clear();
        encode_message(msg, &mut self.encode_buf)?;
        self.link.send(&self.encode_buf)?;
        Ok(())
    }

    /// Borrow the underlying link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Consume the session and return the link.
    pub fn into_link(self) -> L {
        self.link
    }
}
