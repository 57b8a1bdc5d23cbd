//! Vendor `.ini` configuration files.
//!
//! The controller firmware ships two text files, one for the pskey block and one
//! for RF calibration. Each non-comment line is `KEY VALUE[,VALUE...]`:
//!
//! ```text
//! # device personality
//! device_class = 0x001F00
//! device_addr  = 0x88, 0x88, 0x66, 0xDA, 0x45, 0x40
//! win_ext      = 40
//! ```
//!
//! [`schema`] maps keys onto typed fields, [`loader`] drives the parse.

pub mod line;
pub mod loader;
pub mod number;
pub mod schema;
pub mod token;

pub use loader::{load_file, load_from, LoadReport};
pub use number::{decode_values, parse_u32, Decoded};
pub use schema::{ConfigEntry, CustomHandler, FieldMut, Schema, Width};

/// Comment marker. Only honoured in the first column.
pub const COMMENT: char = '#';

/// Separates the key from its value.
pub const KEY_DELIMITERS: &[char] = &[' ', '=', '\n', '\r', '\t'];

/// Ends the value run of a line.
pub const VALUE_DELIMITERS: &[char] = &['=', '\n', '\r', '\t', '#'];

/// Splits a value run into individual numbers.
pub const VALUE_PARTITION: &[char] = &[' ', ',', '=', '\n', '\r', '\t', '#'];

/// Longest line the loader looks at, newline included.
pub const MAX_LINE_LEN: usize = 255;

#[cfg(test)]
mod tests;
