//! In-memory connected link pair.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use crate::error::{LinkError, Result};
use crate::link::ByteLink;

/// One end of an in-memory link pair.
///
/// Bytes written on one end become pollable on the other, preserving
/// order. Used by tests and demos in place of a real serial device.
pub struct LoopbackLink {
    tx: Sender<u8>,
    rx: Receiver<u8>,
}

impl LoopbackLink {
    /// Create a connected pair of links.
    pub fn pair() -> (Self, Self) {
        let (a_tx, a_rx) = channel();
        let (b_tx, b_rx) = channel();
        (
            Self { tx: a_tx, rx: b_rx },
            Self { tx: b_tx, rx: a_rx },
        )
    }
}

impl ByteLink for LoopbackLink {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        match self.rx.try_recv() {
            Ok(byte) => Ok(Some(byte)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(LinkError::Closed),
        }
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.tx.send(byte).map_err(|_| LinkError::Closed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_cross_in_order() {
        let (mut host, mut device) = LoopbackLink::pair();
        host.send(&[1, 2, 3]).unwrap();

        assert_eq!(device.poll_byte().unwrap(), Some(1));
        assert_eq!(device.poll_byte().unwrap(), Some(2));
        assert_eq!(device.poll_byte().unwrap(), Some(3));
        assert_eq!(device.poll_byte().unwrap(), None);
    }

    #[test]
    fn both_directions_are_independent() {
        let (mut host, mut device) = LoopbackLink::pair();
        host.send(&[0xAA]).unwrap();
        device.send(&[0x55]).unwrap();

        assert_eq!(host.poll_byte().unwrap(), Some(0x55));
        assert_eq!(device.poll_byte().unwrap(), Some(0xAA));
    }

    #[test]
    fn dropped_peer_reports_closed() {
        let (mut host, device) = LoopbackLink::pair();
        drop(device);

        assert!(matches!(host.send(&[0]), Err(LinkError::Closed)));
        assert!(matches!(host.poll_byte(), Err(LinkError::Closed)));
    }
}
