//! Bluetooth device address.

use core::fmt;

use rand_core::RngCore;

/// Address the randomized one is derived from, in wire (array) order.
pub const BD_ADDR_TEMPLATE: [u8; 6] = [0x01, 0x88, 0x66, 0xDA, 0x45, 0x40];

/// Number of leading template bytes kept as a fixed prefix.
pub const FIXED_PREFIX_LEN: usize = 3;

/// 48-bit device address, stored in wire (array) order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BdAddr(pub [u8; 6]);

impl BdAddr {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    pub const fn into_bytes(self) -> [u8; 6] {
        self.0
    }

    /// Template prefix followed by a random suffix.
    ///
    /// Bytes `0..3` are the template's fixed prefix; bytes `3..6` are the low
    /// three little-endian bytes of a single `next_u32()` draw.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = BD_ADDR_TEMPLATE;
        let draw = rng.next_u32().to_le_bytes();
        bytes[FIXED_PREFIX_LEN..].copy_from_slice(&draw[..6 - FIXED_PREFIX_LEN]);
        Self(bytes)
    }
}

impl From<[u8; 6]> for BdAddr {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

impl From<BdAddr> for [u8; 6] {
    fn from(addr: BdAddr) -> Self {
        addr.0
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}
