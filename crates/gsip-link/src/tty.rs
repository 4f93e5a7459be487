//! Unix serial device link.
//!
//! Opens a tty, switches it to raw mode at a fixed baud rate, and exposes
//! it as a non-blocking [`ByteLink`]. GSIP devices speak 8N1 with no flow
//! control; everything else about the transport (polling cadence, who
//! opens when) is up to the caller.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{LinkError, Result};
use crate::link::ByteLink;

/// Serial link configuration.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Line rate in baud. Must be one of the standard termios rates:
    /// 9600, 19200, 38400, 57600, or 115200.
    pub baud_rate: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { baud_rate: 115_200 }
    }
}

/// A serial device in raw mode.
#[derive(Debug)]
pub struct TtyLink {
    file: File,
    path: PathBuf,
}

impl TtyLink {
    /// Open a serial device with the default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, LinkConfig::default())
    }

    /// Open a serial device with explicit configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: LinkConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let speed = baud_constant(config.baud_rate)
            .ok_or(LinkError::UnsupportedBaudRate(config.baud_rate))?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
            .open(&path)
            .map_err(|source| LinkError::Open {
                path: path.clone(),
                source,
            })?;

        configure_raw(&file, speed).map_err(|source| LinkError::Open {
            path: path.clone(),
            source,
        })?;

        info!(?path, baud = config.baud_rate, "opened serial link");
        Ok(Self { file, path })
    }

    /// The device path this link was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteLink for TtyLink {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            return match self.file.read(&mut byte) {
                // VMIN=0 raw mode: a zero-length read means no byte is
                // buffered, not end-of-stream.
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(byte[0])),
                Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(None),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => Err(LinkError::Io(err)),
            };
        }
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.file.write(&bytes[offset..]) {
                Ok(0) => return Err(LinkError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(LinkError::Io(err)),
            }
        }
        Ok(())
    }
}

/// Map a baud rate to its termios speed constant.
fn baud_constant(baud: u32) -> Option<libc::speed_t> {
    match baud {
        9_600 => Some(libc::B9600),
        19_200 => Some(libc::B19200),
        38_400 => Some(libc::B38400),
        57_600 => Some(libc::B57600),
        115_200 => Some(libc::B115200),
        _ => None,
    }
}

/// Put the tty into raw 8N1 mode with non-blocking single-byte reads.
fn configure_raw(file: &File, speed: libc::speed_t) -> std::io::Result<()> {
    let fd = file.as_raw_fd();

    // SAFETY: `fd` is an open descriptor owned by `file` for the duration
    // of this call, and `termios` is fully initialized by tcgetattr before
    // any field is read.
    unsafe {
        let mut termios: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &mut termios) != 0 {
            return Err(std::io::Error::last_os_error());
        }

        libc::cfmakeraw(&mut termios);
        termios.c_cflag |= libc::CLOCAL | libc::CREAD;
        termios.c_cc[libc::VMIN] = 0;
        termios.c_cc[libc::VTIME] = 0;

        if libc::cfsetispeed(&mut termios, speed) != 0
            || libc::cfsetospeed(&mut termios, speed) != 0
        {
            return Err(std::io::Error::last_os_error());
        }
        if libc::tcsetattr(fd, libc::TCSANOW, &termios) != 0 {
            return Err(std::io::Error::last_os_error());
        }
        if libc::tcflush(fd, libc::TCIOFLUSH) != 0 {
            return Err(std::io::Error::last_os_error());
        }
    }

    Ok(())
}
