//! HCI command transport.
//!
//! [`HciTransport`] is what bring-up sends its vendor commands through. The
//! response payload is not interpreted beyond its status byte.
//!
//! [`H4Transport`] implements it over any byte stream (UART, pipe, socket)
//! using H4 framing: each packet is preceded by a one-byte type indicator.

use core::fmt;

use embedded_io::{Read, ReadExactError, Write};

use crate::cmd::{Opcode, MAX_PARAM_LEN};

/// Sends one HCI command and waits for the controller to answer it.
pub trait HciTransport {
    type Error: fmt::Debug;

    /// Send `opcode` with `params` and block until the controller reports the
    /// command status. Returns the HCI status byte (`0x00` = success).
    fn send_sync(&mut self, opcode: Opcode, params: &[u8]) -> Result<u8, Self::Error>;
}

impl<T: HciTransport + ?Sized> HciTransport for &mut T {
    type Error = T::Error;

    fn send_sync(&mut self, opcode: Opcode, params: &[u8]) -> Result<u8, Self::Error> {
        T::send_sync(self, opcode, params)
    }
}

/// H4 packet indicators.
pub mod indicator {
    pub const COMMAND: u8 = 0x01;
    pub const ACL_DATA: u8 = 0x02;
    pub const SYNC_DATA: u8 = 0x03;
    pub const EVENT: u8 = 0x04;
}

/// HCI event codes the transport looks at.
pub mod event {
    pub const COMMAND_COMPLETE: u8 = 0x0E;
    pub const COMMAND_STATUS: u8 = 0x0F;
}

/// H4 transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Reading from the stream failed or hit end of stream.
    Read(ReadExactError<E>),
    /// Writing to the stream failed.
    Write(E),
    /// Packet indicator not defined by H4.
    UnknownPacket(u8),
    /// Command parameters longer than an HCI command can carry.
    ParamsTooLong(usize),
    /// Command Complete/Status event too short to hold an opcode and status.
    EventTooShort {
        code: u8,
        len: usize,
    },
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(e) => write!(f, "HCI read error: {:?}", e),
            Self::Write(e) => write!(f, "HCI write error: {:?}", e),
            Self::UnknownPacket(b) => write!(f, "unknown H4 packet indicator 0x{:02X}", b),
            Self::ParamsTooLong(len) => {
                write!(f, "command parameters too long: {} > {}", len, MAX_PARAM_LEN)
            }
            Self::EventTooShort { code, len } => {
                write!(f, "event 0x{:02X} too short ({} bytes)", code, len)
            }
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}

impl<E> From<ReadExactError<E>> for Error<E> {
    fn from(e: ReadExactError<E>) -> Self {
        Self::Read(e)
    }
}

/// [`HciTransport`] over an H4-framed byte stream.
pub struct H4Transport<IO> {
    io: IO,
    buf: [u8; MAX_PARAM_LEN],
}

impl<IO: Read + Write> H4Transport<IO> {
    pub fn new(io: IO) -> Self {
        Self {
            io,
            buf: [0; MAX_PARAM_LEN],
        }
    }

    pub fn into_inner(self) -> IO {
        self.io
    }

    fn write_command(&mut self, opcode: Opcode, params: &[u8]) -> Result<(), Error<IO::Error>> {
        let len = u8::try_from(params.len()).map_err(|_| Error::ParamsTooLong(params.len()))?;
        let [lo, hi] = opcode.to_le_bytes();
        self.io
            .write_all(&[indicator::COMMAND, lo, hi, len])
            .map_err(Error::Write)?;
        self.io.write_all(params).map_err(Error::Write)?;
        self.io.flush().map_err(Error::Write)
    }

    /// Read and drop `len` bytes.
    fn skip(&mut self, mut len: usize) -> Result<(), Error<IO::Error>> {
        while len > 0 {
            let n = len.min(self.buf.len());
            self.io.read_exact(&mut self.buf[..n])?;
            len -= n;
        }
        Ok(())
    }

    /// Wait for the Command Complete or Command Status event of `opcode`.
    fn wait_status(&mut self, opcode: Opcode) -> Result<u8, Error<IO::Error>> {
        loop {
            let mut ind = [0u8; 1];
            self.io.read_exact(&mut ind)?;

            match ind[0] {
                indicator::EVENT => {
                    let mut header = [0u8; 2];
                    self.io.read_exact(&mut header)?;
                    let [code, len] = header;
                    let len = len as usize;
                    self.io.read_exact(&mut self.buf[..len])?;
                    if let Some(status) = command_status(opcode, code, &self.buf[..len])? {
                        return Ok(status);
                    }
                }
                indicator::ACL_DATA => {
                    let mut header = [0u8; 4];
                    self.io.read_exact(&mut header)?;
                    let len = u16::from_le_bytes([header[2], header[3]]);
                    trace!("skipping ACL packet, {} bytes", len);
                    self.skip(len as usize)?;
                }
                indicator::SYNC_DATA => {
                    let mut header = [0u8; 3];
                    self.io.read_exact(&mut header)?;
                    trace!("skipping SCO packet, {} bytes", header[2]);
                    self.skip(header[2] as usize)?;
                }
                other => return Err(Error::UnknownPacket(other)),
            }
        }
    }
}

/// Status byte of a Command Complete/Status event answering `opcode`, if
/// `code`/`params` are one.
fn command_status<E>(opcode: Opcode, code: u8, params: &[u8]) -> Result<Option<u8>, Error<E>> {
    let (event_opcode, status) = match code {
        // num_packets, opcode, status, return parameters...
        event::COMMAND_COMPLETE => match params {
            [_, lo, hi, status, ..] => (u16::from_le_bytes([*lo, *hi]), *status),
            _ => return Err(Error::EventTooShort { code, len: params.len() }),
        },
        // status, num_packets, opcode
        event::COMMAND_STATUS => match params {
            [status, _, lo, hi, ..] => (u16::from_le_bytes([*lo, *hi]), *status),
            _ => return Err(Error::EventTooShort { code, len: params.len() }),
        },
        _ => {
            trace!("skipping event 0x{:02X}", code);
            return Ok(None);
        }
    };

    if event_opcode == opcode.raw() {
        Ok(Some(status))
    } else {
        debug!(
            "event 0x{:02X} for opcode 0x{:04X} while waiting for 0x{:04X}",
            code,
            event_opcode,
            opcode.raw()
        );
        Ok(None)
    }
}

impl<IO: Read + Write> HciTransport for H4Transport<IO> {
    type Error = Error<IO::Error>;

    fn send_sync(&mut self, opcode: Opcode, params: &[u8]) -> Result<u8, Self::Error> {
        debug!("HCI command 0x{:04X}, {} bytes", opcode.raw(), params.len());
        self.write_command(opcode, params)?;
        let status = self.wait_status(opcode)?;
        if status != 0 {
            warn!("HCI command 0x{:04X} status 0x{:02X}", opcode.raw(), status);
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::opcode;

    /// Replays scripted controller bytes and records what the host wrote.
    struct Loopback {
        rx: Vec<u8>,
        pos: usize,
        tx: Vec<u8>,
    }

    impl Loopback {
        fn new(rx: &[u8]) -> Self {
            Self {
                rx: rx.to_vec(),
                pos: 0,
                tx: Vec::new(),
            }
        }
    }

    impl embedded_io::ErrorType for Loopback {
        type Error = embedded_io::ErrorKind;
    }

    impl Read for Loopback {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let n = buf.len().min(self.rx.len() - self.pos);
            buf[..n].copy_from_slice(&self.rx[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    impl Write for Loopback {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn frames_command_and_reads_command_complete() {
        let rx = [0x04, 0x0E, 0x04, 0x01, 0xA1, 0xFC, 0x00];
        let mut t = H4Transport::new(Loopback::new(&rx));
        assert_eq!(t.send_sync(opcode::ENABLE, &[0x03, 0x00, 0x01]), Ok(0x00));
        assert_eq!(
            t.into_inner().tx,
            vec![0x01, 0xA1, 0xFC, 0x03, 0x03, 0x00, 0x01]
        );
    }

    #[test]
    fn skips_unrelated_traffic() {
        #[rustfmt::skip]
        let rx = [
            // ACL packet, 2 bytes
            0x02, 0x01, 0x00, 0x02, 0x00, 0xAA, 0xBB,
            // unrelated event
            0x04, 0x13, 0x01, 0x00,
            // Command Complete for another opcode
            0x04, 0x0E, 0x04, 0x01, 0x03, 0x0C, 0x00,
            // Command Status for ours
            0x04, 0x0F, 0x04, 0x0C, 0x01, 0xA0, 0xFC,
        ];
        let mut t = H4Transport::new(Loopback::new(&rx));
        assert_eq!(t.send_sync(opcode::PSKEY, &[]), Ok(0x0C));
    }

    #[test]
    fn end_of_stream_is_a_read_error() {
        let mut t = H4Transport::new(Loopback::new(&[]));
        assert_eq!(
            t.send_sync(opcode::RF, &[1, 2, 3]),
            Err(Error::Read(ReadExactError::UnexpectedEof))
        );
    }

    #[test]
    fn rejects_unknown_indicator() {
        let mut t = H4Transport::new(Loopback::new(&[0x09]));
        assert_eq!(t.send_sync(opcode::RF, &[]), Err(Error::UnknownPacket(0x09)));
    }

    #[test]
    fn rejects_oversized_params() {
        let mut t = H4Transport::new(Loopback::new(&[]));
        let params = [0u8; 256];
        assert_eq!(t.send_sync(opcode::RF, &params), Err(Error::ParamsTooLong(256)));
    }
}
