//! Numeric value decoding.
//!
//! Values are decimal, or hexadecimal with a `0x`/`0X` prefix. Conversion
//! follows `strtoul`: the longest valid digit prefix is used and text that is
//! not a number at all decodes as zero. Nothing here fails; tokens that were
//! not cleanly numeric are only counted in [`Decoded::malformed`].

use super::schema::FieldMut;
use super::token::Tokenizer;
use super::VALUE_PARTITION;

/// Outcome of decoding one value run into a field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decoded {
    /// Slots written.
    pub written: usize,
    /// Tokens that were not entirely a valid number.
    pub malformed: usize,
}

/// Parse one token to `u32`.
///
/// Returns the value and whether the whole token was a well-formed number.
/// Overflow saturates to `u32::MAX`; a leading `-` on a decimal wraps.
pub fn parse_u32(token: &str) -> (u32, bool) {
    let (radix, digits, negative) = match token.as_bytes() {
        [b'0', b'x' | b'X', ..] => (16, &token[2..], false),
        [b'-', ..] => (10, &token[1..], true),
        [b'+', ..] => (10, &token[1..], false),
        _ => (10, token, false),
    };

    let mut value: u32 = 0;
    let mut consumed = 0;
    let mut overflow = false;
    for d in digits.chars().map_while(|c| c.to_digit(radix)) {
        consumed += 1;
        match value.checked_mul(radix).and_then(|v| v.checked_add(d)) {
            Some(v) => value = v,
            None => overflow = true,
        }
    }

    if overflow {
        value = u32::MAX;
    } else if negative {
        value = value.wrapping_neg();
    }

    let clean = consumed > 0 && consumed == digits.len() && !overflow;
    (value, clean)
}

/// Decode a comma/space separated value run into `field`.
///
/// Fills slots from index 0 upwards, masking each value to the slot width.
/// Stops at the field's element count or when the tokens run out, so
/// surplus tokens are ignored and unfilled slots keep their old value.
pub fn decode_values(value: &str, field: FieldMut<'_>) -> Decoded {
    let mut decoded = Decoded::default();
    let mut tokens = Tokenizer::new(value).tokens(VALUE_PARTITION);

    match field {
        FieldMut::U8(slots) => fill(slots, &mut tokens, &mut decoded, |v| v as u8),
        FieldMut::U16(slots) => fill(slots, &mut tokens, &mut decoded, |v| v as u16),
        FieldMut::U32(slots) => fill(slots, &mut tokens, &mut decoded, |v| v),
    }

    decoded
}

fn fill<'a, E>(
    slots: &mut [E],
    tokens: &mut impl Iterator<Item = &'a str>,
    decoded: &mut Decoded,
    narrow: impl Fn(u32) -> E,
) {
    for (slot, token) in slots.iter_mut().zip(tokens) {
        let (value, clean) = parse_u32(token);
        if !clean {
            decoded.malformed += 1;
        }
        *slot = narrow(value);
        decoded.written += 1;
    }
}
