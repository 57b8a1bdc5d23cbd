//! Vendor HCI command payloads.
//!
//! Payloads are built into a [`CommandBuf`], a fixed-capacity buffer sized for
//! the largest HCI command parameter block (255 bytes). Everything is written
//! little-endian; arrays go out in ascending index order. Running out of room
//! is reported as [`CommandError::Overflow`].

use core::fmt;

/// Maximum HCI command parameter length.
pub const MAX_PARAM_LEN: usize = 255;

/// Vendor-specific OGF.
const OGF_VENDOR: u16 = 0x3F;

/// HCI command opcode (OGF in the top 6 bits, OCF in the low 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Opcode(u16);

impl Opcode {
    /// Vendor-specific (OGF 0x3F) opcode.
    pub const fn vendor(ocf: u16) -> Self {
        Self((OGF_VENDOR << 10) | (ocf & 0x03FF))
    }

    /// Raw 16-bit value.
    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn ogf(self) -> u16 {
        self.0 >> 10
    }

    pub const fn ocf(self) -> u16 {
        self.0 & 0x03FF
    }

    /// Opcode as sent on the wire.
    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// UWP56xx bring-up opcodes.
pub mod opcode {
    use super::Opcode;

    /// Device personality (pskey) block.
    pub const PSKEY: Opcode = Opcode::vendor(0xA0);
    /// Controller enable.
    pub const ENABLE: Opcode = Opcode::vendor(0xA1);
    /// RF calibration block.
    pub const RF: Opcode = Opcode::vendor(0xA2);
}

/// Command build error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Payload does not fit in the buffer.
    Overflow {
        /// Bytes the payload would have needed so far.
        needed: usize,
        /// Buffer capacity.
        capacity: usize,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow { needed, capacity } => write!(
                f,
                "command payload overflow: {} bytes needed, capacity {}",
                needed, capacity
            ),
        }
    }
}

impl core::error::Error for CommandError {}

/// Capacity-checked little-endian payload buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandBuf {
    bytes: heapless::Vec<u8, MAX_PARAM_LEN>,
}

impl CommandBuf {
    /// Empty buffer.
    pub const fn new() -> Self {
        Self {
            bytes: heapless::Vec::new(),
        }
    }

    /// Append raw bytes.
    pub fn put_bytes(&mut self, data: &[u8]) -> Result<(), CommandError> {
        let needed = self.bytes.len() + data.len();
        self.bytes
            .extend_from_slice(data)
            .map_err(|_| CommandError::Overflow {
                needed,
                capacity: MAX_PARAM_LEN,
            })
    }

    pub fn put_u8(&mut self, value: u8) -> Result<(), CommandError> {
        self.put_bytes(&[value])
    }

    pub fn put_u16(&mut self, value: u16) -> Result<(), CommandError> {
        self.put_bytes(&value.to_le_bytes())
    }

    pub fn put_u32(&mut self, value: u32) -> Result<(), CommandError> {
        self.put_bytes(&value.to_le_bytes())
    }

    /// Append any [`Put`] value (scalar or array).
    pub fn put<P: Put + ?Sized>(&mut self, value: &P) -> Result<(), CommandError> {
        value.put_into(self)
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        MAX_PARAM_LEN
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for CommandBuf {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// A value with a fixed little-endian wire encoding.
pub trait Put {
    fn put_into(&self, buf: &mut CommandBuf) -> Result<(), CommandError>;
}

impl Put for u8 {
    fn put_into(&self, buf: &mut CommandBuf) -> Result<(), CommandError> {
        buf.put_u8(*self)
    }
}

impl Put for u16 {
    fn put_into(&self, buf: &mut CommandBuf) -> Result<(), CommandError> {
        buf.put_u16(*self)
    }
}

impl Put for u32 {
    fn put_into(&self, buf: &mut CommandBuf) -> Result<(), CommandError> {
        buf.put_u32(*self)
    }
}

impl<P: Put> Put for [P] {
    fn put_into(&self, buf: &mut CommandBuf) -> Result<(), CommandError> {
        self.iter().try_for_each(|v| v.put_into(buf))
    }
}

impl<P: Put, const N: usize> Put for [P; N] {
    fn put_into(&self, buf: &mut CommandBuf) -> Result<(), CommandError> {
        self.as_slice().put_into(buf)
    }
}

/// A structure sent to the controller as one vendor command.
pub trait WireCommand {
    /// Opcode the payload is sent with.
    const OPCODE: Opcode;

    /// Append the payload, fields in protocol order.
    fn write_payload(&self, buf: &mut CommandBuf) -> Result<(), CommandError>;

    /// Serialize into a fresh buffer.
    fn to_command(&self) -> Result<CommandBuf, CommandError> {
        let mut buf = CommandBuf::new();
        self.write_payload(&mut buf)?;
        Ok(buf)
    }
}

/// Controller enable command: 16-bit mode selector, then enable flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Enable {
    pub mode: u16,
    pub enable: u8,
}

impl Enable {
    /// BR/EDR + LE.
    pub const DUAL_MODE: u16 = 3;
    pub const ENABLE_BT: u8 = 1;
    pub const DISABLE_BT: u8 = 0;

    /// Enable the controller in dual mode.
    pub const DEFAULT: Self = Self {
        mode: Self::DUAL_MODE,
        enable: Self::ENABLE_BT,
    };
}

impl Default for Enable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl WireCommand for Enable {
    const OPCODE: Opcode = opcode::ENABLE;

    fn write_payload(&self, buf: &mut CommandBuf) -> Result<(), CommandError> {
        buf.put_u16(self.mode)?;
        buf.put_u8(self.enable)
    }
}
