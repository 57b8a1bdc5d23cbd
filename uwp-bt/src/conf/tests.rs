use proptest::prelude::*;

use super::line::LineReader;
use super::number::{decode_values, parse_u32, Decoded};
use super::schema::{ConfigEntry, FieldMut, Schema, Width};
use super::token::Tokenizer;
use super::{load_from, LoadReport, KEY_DELIMITERS, MAX_LINE_LEN, VALUE_DELIMITERS, VALUE_PARTITION};
use crate::cmd::WireCommand;
use crate::pskey::{PskeyConfig, PSKEY_LEN};
use crate::rf::{RfConfig, RF_LEN};

fn load<T: Schema>(text: &str, target: &mut T) -> LoadReport {
    load_from(text.as_bytes(), target)
}

/// Load `KEY = 0x1A` for every entry and check that exactly one payload byte
/// changes, at an offset no other key uses.
fn assert_single_byte_per_key<T>(zeroed: T, len: usize)
where
    T: Schema + WireCommand + Copy,
{
    let mut offsets = Vec::new();
    for entry in T::TABLE {
        let mut cfg = zeroed;
        let report = load(&format!("{} = 0x1A\n", entry.key), &mut cfg);
        assert_eq!(report.applied, 1, "{}", entry.key);

        let payload = cfg.to_command().unwrap();
        assert_eq!(payload.len(), len);

        let set: Vec<(usize, u8)> = payload
            .as_slice()
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, b)| b != 0)
            .collect();
        assert_eq!(set.len(), 1, "{}: {:?}", entry.key, set);
        assert_eq!(set[0].1, 0x1A, "{}", entry.key);
        assert!(!offsets.contains(&set[0].0), "{} reuses offset {}", entry.key, set[0].0);
        offsets.push(set[0].0);
    }
}

// Tokenizer

#[test]
fn tokenizer_skips_runs_of_delimiters() {
    let tokens: Vec<&str> = Tokenizer::new("  1,, 2 ,3\n").tokens(VALUE_PARTITION).collect();
    assert_eq!(tokens, ["1", "2", "3"]);
}

#[test]
fn tokenizer_switches_delimiter_sets() {
    let mut cursor = Tokenizer::new("device_addr = 0x88, 0x88 # trailing\n");
    assert_eq!(cursor.next_token(KEY_DELIMITERS), Some("device_addr"));
    assert_eq!(cursor.next_token(VALUE_DELIMITERS), Some(" 0x88, 0x88 "));
    assert_eq!(cursor.rest(), " trailing\n");
}

#[test]
fn tokenizer_stays_exhausted() {
    let mut cursor = Tokenizer::new(" \t\n");
    assert_eq!(cursor.next_token(KEY_DELIMITERS), None);
    assert_eq!(cursor.next_token(KEY_DELIMITERS), None);
    assert_eq!(cursor.rest(), "");
}

// Line reader

#[test]
fn line_reader_splits_lines_and_keeps_last_unterminated() {
    let mut lines = LineReader::new(&b"a\nb\r\n\nlast"[..]);
    assert_eq!(lines.next_line(), Some("a\n"));
    assert_eq!(lines.next_line(), Some("b\r\n"));
    assert_eq!(lines.next_line(), Some("\n"));
    assert_eq!(lines.next_line(), Some("last"));
    assert_eq!(lines.next_line(), None);
}

#[test]
fn line_reader_cuts_long_lines() {
    let mut text = vec![b'x'; 300];
    text.push(b'\n');
    let mut lines = LineReader::new(text.as_slice());
    assert_eq!(lines.next_line().map(str::len), Some(MAX_LINE_LEN));
    assert_eq!(lines.next_line().map(str::len), Some(300 - MAX_LINE_LEN + 1));
    assert_eq!(lines.next_line(), None);
}

// Numbers

#[test]
fn parse_decimal_and_hex() {
    assert_eq!(parse_u32("26"), (26, true));
    assert_eq!(parse_u32("0x1A"), (0x1A, true));
    assert_eq!(parse_u32("0X1a"), (0x1A, true));
    assert_eq!(parse_u32("0xFFFFFFFF"), (u32::MAX, true));
}

#[test]
fn parse_keeps_numeric_prefix() {
    assert_eq!(parse_u32("12ab"), (12, false));
    assert_eq!(parse_u32("0x1G"), (1, false));
    assert_eq!(parse_u32("zz"), (0, false));
    assert_eq!(parse_u32("0x"), (0, false));
}

#[test]
fn parse_overflow_saturates_and_minus_wraps() {
    assert_eq!(parse_u32("4294967296"), (u32::MAX, false));
    assert_eq!(parse_u32("0x100000000"), (u32::MAX, false));
    assert_eq!(parse_u32("-1"), (u32::MAX, true));
}

#[test]
fn decode_fewer_tokens_leaves_tail() {
    let mut slots = [9u16; 4];
    let decoded = decode_values(" 1, 2", FieldMut::from(&mut slots));
    assert_eq!(decoded, Decoded { written: 2, malformed: 0 });
    assert_eq!(slots, [1, 2, 9, 9]);
}

#[test]
fn decode_ignores_surplus_tokens() {
    let mut slots = [0u8; 2];
    let decoded = decode_values("1 2 3", FieldMut::from(&mut slots));
    assert_eq!(decoded.written, 2);
    assert_eq!(slots, [1, 2]);
}

#[test]
fn decode_narrows_to_slot_width() {
    let mut byte = 0u8;
    let mut word = 0u16;
    decode_values("0x1234", FieldMut::from(&mut byte));
    decode_values("0x12345678", FieldMut::from(&mut word));
    assert_eq!(byte, 0x34);
    assert_eq!(word, 0x5678);
}

#[test]
fn decode_counts_malformed_tokens() {
    let mut slots = [7u32; 3];
    let decoded = decode_values("5, x, 0x", FieldMut::from(&mut slots));
    assert_eq!(decoded, Decoded { written: 3, malformed: 2 });
    assert_eq!(slots, [5, 0, 0]);
}

#[test]
fn field_views_report_width_and_size() {
    let mut cfg = PskeyConfig::ZEROED;
    let field = PskeyConfig::lookup("bt_coex_threshold").unwrap().field(&mut cfg);
    assert_eq!(field.width(), Width::U16);
    assert_eq!(field.count(), 8);
    assert_eq!(field.size(), 16);
}

// Loader

#[test]
fn comments_and_blank_lines_change_nothing() {
    let mut cfg = PskeyConfig::ZEROED;
    let report = load("# device_class = 5\n\n \t \r\n#win_ext 9\n", &mut cfg);
    assert_eq!(cfg, PskeyConfig::ZEROED);
    assert_eq!(report.lines, 4);
    assert_eq!(report.applied, 0);
    assert_eq!(report.unknown_keys, 0);
}

#[test]
fn unknown_keys_do_not_stop_the_load() {
    let mut cfg = PskeyConfig::ZEROED;
    let report = load("bogus = 1\nwin_ext = 40\nBOGUS\t2\ntx_delay 12", &mut cfg);
    assert_eq!(report.unknown_keys, 2);
    assert_eq!(report.applied, 2);
    assert_eq!(cfg.win_ext, 40);
    assert_eq!(cfg.tx_delay, 12);
}

#[test]
fn key_without_value_is_counted() {
    let mut cfg = PskeyConfig::ZEROED;
    let report = load("win_ext\n", &mut cfg);
    assert_eq!(report.missing_value, 1);
    assert_eq!(report.applied, 0);
    assert_eq!(cfg, PskeyConfig::ZEROED);
}

#[test]
fn keys_match_case_sensitively() {
    let mut cfg = PskeyConfig::ZEROED;
    let report = load("LOGLEVEL = 3\nLogLevel = 4\n", &mut cfg);
    assert_eq!(report.unknown_keys, 1);
    assert_eq!(cfg.log_level, 4);
}

#[test]
fn later_lines_override_earlier() {
    let mut cfg = RfConfig::ZEROED;
    load(
        "g_GainValue_A = 1, 2, 3, 4, 5, 6\ng_GainValue_A = 0xE000, 0xE001\n",
        &mut cfg,
    );
    assert_eq!(cfg.gain_value_a, [0xE000, 0xE001, 3, 4, 5, 6]);
}

#[test]
fn malformed_values_are_stored_and_reported() {
    let mut cfg = PskeyConfig::ZEROED;
    let report = load("comp_id = 0x1EC\ncp2_log_mode = on\n", &mut cfg);
    assert_eq!(report.applied, 2);
    assert_eq!(report.malformed, 1);
    assert_eq!(cfg.comp_id, 0x01EC);
    assert_eq!(cfg.cp2_log_mode, 0);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Demo {
    flag: u8,
    words: [u16; 2],
}

fn all_ones(_key: &str, _value: &str, field: FieldMut<'_>) -> Decoded {
    match field {
        FieldMut::U16(slots) => {
            slots.fill(0xFFFF);
            Decoded { written: slots.len(), malformed: 0 }
        }
        _ => Decoded::default(),
    }
}

fn demo_words(target: &mut Demo) -> FieldMut<'_> {
    FieldMut::from(&mut target.words)
}

fn demo_flag(target: &mut Demo) -> FieldMut<'_> {
    FieldMut::from(&mut target.flag)
}

impl Schema for Demo {
    const TABLE: &'static [ConfigEntry<Self>] = &[
        ConfigEntry { key: "flag", handler: None, access: demo_flag },
        ConfigEntry { key: "words", handler: Some(all_ones), access: demo_words },
    ];
}

#[test]
fn custom_handler_replaces_decoder() {
    let mut demo = Demo::default();
    let report = load("flag = 2\nwords = 1, 2\n", &mut demo);
    assert_eq!(report.applied, 2);
    assert_eq!(demo, Demo { flag: 2, words: [0xFFFF, 0xFFFF] });
}

// Layout

#[test]
fn pskey_layout() {
    let mut cfg = PskeyConfig::ZEROED;
    load(
        "device_class = 0x001F00\ndevice_addr = 1, 2, 3, 4, 5, 6\n",
        &mut cfg,
    );
    let payload = cfg.to_command().unwrap();
    assert_eq!(payload.len(), PSKEY_LEN);
    assert_eq!(payload.as_slice()[0..4], [0x00, 0x1F, 0x00, 0x00]);
    assert_eq!(payload.as_slice()[20..26], [1, 2, 3, 4, 5, 6]);
}

#[test]
fn payload_sizes() {
    assert_eq!(PskeyConfig::VENDOR_DEFAULT.to_command().unwrap().len(), PSKEY_LEN);
    assert_eq!(RfConfig::VENDOR_DEFAULT.to_command().unwrap().len(), RF_LEN);
    assert_eq!(RfConfig::ZEROED.to_command().unwrap().len(), RF_LEN);
}

#[test]
fn pskey_keys_map_to_distinct_offsets() {
    assert_single_byte_per_key(PskeyConfig::ZEROED, PSKEY_LEN);
}

#[test]
fn rf_keys_map_to_distinct_offsets() {
    assert_single_byte_per_key(RfConfig::ZEROED, RF_LEN);
}

proptest! {
    #[test]
    fn tokens_are_non_empty_and_delimiter_free(text in "[ ,=\t#0-9a-fx]{0,64}") {
        for token in Tokenizer::new(&text).tokens(VALUE_PARTITION) {
            prop_assert!(!token.is_empty());
            prop_assert!(!token.contains(VALUE_PARTITION));
        }
    }

    #[test]
    fn formatted_numbers_parse_cleanly(value: u32) {
        prop_assert_eq!(parse_u32(&format!("{}", value)), (value, true));
        prop_assert_eq!(parse_u32(&format!("{:#x}", value)), (value, true));
    }

    #[test]
    fn short_lists_keep_unfilled_slots(values in prop::collection::vec(any::<u8>(), 0..8)) {
        let text: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let mut slots = [0xAAu8; 8];
        let decoded = decode_values(&text.join(", "), FieldMut::from(&mut slots));
        prop_assert_eq!(decoded.written, values.len());
        prop_assert_eq!(&slots[..values.len()], values.as_slice());
        prop_assert!(slots[values.len()..].iter().all(|&b| b == 0xAA));
    }
}
