//! Key → field schema tables.
//!
//! A schema is an ordered slice of [`ConfigEntry`]. Each entry names a key and
//! carries an accessor returning the backing field as a typed slice
//! ([`FieldMut`]), so element width and count come from the field's type
//! rather than from offsets.

use super::number::{decode_values, Decoded};

/// Element width of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Width {
    U8 = 1,
    U16 = 2,
    U32 = 4,
}

impl Width {
    /// Width in bytes.
    pub const fn bytes(self) -> usize {
        self as usize
    }
}

/// Mutable view of one configuration field. Scalars are one-element slices.
#[derive(Debug, PartialEq, Eq)]
pub enum FieldMut<'a> {
    U8(&'a mut [u8]),
    U16(&'a mut [u16]),
    U32(&'a mut [u32]),
}

impl FieldMut<'_> {
    /// Element width.
    pub fn width(&self) -> Width {
        match self {
            Self::U8(_) => Width::U8,
            Self::U16(_) => Width::U16,
            Self::U32(_) => Width::U32,
        }
    }

    /// Element count.
    pub fn count(&self) -> usize {
        match self {
            Self::U8(s) => s.len(),
            Self::U16(s) => s.len(),
            Self::U32(s) => s.len(),
        }
    }

    /// Size of the whole field in bytes.
    pub fn size(&self) -> usize {
        self.width().bytes() * self.count()
    }
}

macro_rules! impl_field_from {
    ($variant:ident, $ty:ty) => {
        impl<'a> From<&'a mut $ty> for FieldMut<'a> {
            fn from(v: &'a mut $ty) -> Self {
                FieldMut::$variant(core::slice::from_mut(v))
            }
        }

        impl<'a, const N: usize> From<&'a mut [$ty; N]> for FieldMut<'a> {
            fn from(v: &'a mut [$ty; N]) -> Self {
                FieldMut::$variant(v)
            }
        }
    };
}

impl_field_from!(U8, u8);
impl_field_from!(U16, u16);
impl_field_from!(U32, u32);

/// Replaces the numeric decoder for one entry.
///
/// Gets the key, the raw value run and the target field.
pub type CustomHandler = fn(key: &str, value: &str, field: FieldMut<'_>) -> Decoded;

/// Borrow one field out of the structure.
pub type Accessor<T> = for<'a> fn(&'a mut T) -> FieldMut<'a>;

/// One row of a schema table.
pub struct ConfigEntry<T: 'static> {
    /// Key as written in the file. Matched case-sensitively.
    pub key: &'static str,
    /// Optional handler used instead of [`decode_values`].
    pub handler: Option<CustomHandler>,
    /// Accessor for the backing field. Must not alias any other entry's field.
    pub access: Accessor<T>,
}

impl<T: 'static> ConfigEntry<T> {
    /// The backing field of this entry inside `target`.
    pub fn field<'a>(&self, target: &'a mut T) -> FieldMut<'a> {
        (self.access)(target)
    }

    /// Store `value` into the backing field of `target`.
    pub fn apply(&self, target: &mut T, value: &str) -> Decoded {
        let field = self.field(target);
        match self.handler {
            Some(handler) => handler(self.key, value, field),
            None => decode_values(value, field),
        }
    }
}

impl<T: 'static> Clone for ConfigEntry<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for ConfigEntry<T> {}

impl<T: 'static> core::fmt::Debug for ConfigEntry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConfigEntry")
            .field("key", &self.key)
            .field("custom", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}

/// A structure that can be populated from a configuration file.
pub trait Schema: Sized + 'static {
    /// Entries in file order. Keys are expected to be unique.
    const TABLE: &'static [ConfigEntry<Self>];

    /// First entry whose key equals `key`.
    fn lookup(key: &str) -> Option<&'static ConfigEntry<Self>> {
        Self::TABLE.iter().find(|entry| entry.key == key)
    }
}
