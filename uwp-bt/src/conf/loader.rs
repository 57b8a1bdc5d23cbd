//! Populate a [`Schema`] structure from a configuration file.

use embedded_io::Read;

use super::line::LineReader;
use super::schema::Schema;
use super::token::Tokenizer;
use super::{COMMENT, KEY_DELIMITERS, VALUE_DELIMITERS};
use crate::fs::FileSystem;

/// What a load did. Loading itself never fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadReport {
    /// The file could be opened.
    pub found: bool,
    /// Lines read, comments and blanks included.
    pub lines: usize,
    /// Lines whose key matched a schema entry.
    pub applied: usize,
    /// Lines with a key but no value.
    pub missing_value: usize,
    /// Lines whose key is not in the schema.
    pub unknown_keys: usize,
    /// Value tokens that were not cleanly numeric (stored as decoded anyway).
    pub malformed: usize,
}

/// Load `path` from `fs` into `target`.
///
/// A file that cannot be opened is not an error: `target` is left as it is
/// and the report says `found: false`. The file is closed before returning.
pub fn load_file<F, T>(fs: &mut F, path: &str, target: &mut T) -> LoadReport
where
    F: FileSystem + ?Sized,
    T: Schema,
{
    info!("Attempt to load conf from {}", path);

    match fs.open(path) {
        Ok(file) => load_from(file, target),
        Err(_) => {
            warn!("conf file {} not found", path);
            LoadReport::default()
        }
    }
}

/// Load every line of `reader` into `target`.
pub fn load_from<R, T>(reader: R, target: &mut T) -> LoadReport
where
    R: Read,
    T: Schema,
{
    let mut report = LoadReport {
        found: true,
        ..LoadReport::default()
    };

    let mut lines = LineReader::new(reader);
    while let Some(line) = lines.next_line() {
        report.lines += 1;
        apply_line(line, target, &mut report);
    }

    debug!(
        "conf loaded: lines={} applied={} unknown={} missing={} malformed={}",
        report.lines,
        report.applied,
        report.unknown_keys,
        report.missing_value,
        report.malformed
    );

    report
}

fn apply_line<T: Schema>(line: &str, target: &mut T, report: &mut LoadReport) {
    if line.starts_with(COMMENT) {
        return;
    }

    let mut cursor = Tokenizer::new(line);
    let Some(key) = cursor.next_token(KEY_DELIMITERS) else {
        return;
    };
    let Some(value) = cursor.next_token(VALUE_DELIMITERS) else {
        warn!("missing value for name: {}", key);
        report.missing_value += 1;
        return;
    };

    let Some(entry) = T::lookup(key) else {
        debug!("ignoring unknown key {}", key);
        report.unknown_keys += 1;
        return;
    };

    debug!("{} -> {}", key, value);
    let decoded = entry.apply(target, value);
    if decoded.malformed > 0 {
        warn!("{}: {} malformed value(s) stored as decoded", key, decoded.malformed);
    }
    report.applied += 1;
    report.malformed += decoded.malformed;
}
