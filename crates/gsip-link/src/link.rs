use crate::error::Result;

/// A byte-oriented link to a GSIP peer.
///
/// The read side is a non-blocking poll: `Ok(None)` means no byte is
/// currently available, never end-of-stream. The decoder loop calls it
/// repeatedly on each wake-up and simply retains its partial frame state
/// between polls.
pub trait ByteLink {
    /// Fetch the next buffered byte, if any, without blocking.
    fn poll_byte(&mut self) -> Result<Option<u8>>;

    /// Write a complete byte sequence to the link.
    fn send(&mut self, bytes: &[u8]) -> Result<()>;
}

impl<L: ByteLink + ?Sized> ByteLink for &mut L {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        (**self).poll_byte()
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).send(bytes)
    }
}
