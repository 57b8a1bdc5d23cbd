//! Delimiter-driven tokenizer over a borrowed line.

/// Cursor over a line of text.
///
/// Each call to [`next_token`](Self::next_token) skips leading delimiters,
/// returns the next run of non-delimiters and consumes exactly one trailing
/// delimiter. The delimiter set may change from one call to the next, which
/// is how the loader first splits off the key and then takes the rest of the
/// line as the value run.
///
/// The input is never modified; tokens are sub-slices of it.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    /// Start scanning `text`.
    pub const fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    /// Next token, or `None` once only delimiters (or nothing) remain.
    ///
    /// Calling again after `None` keeps returning `None`.
    pub fn next_token(&mut self, delims: &[char]) -> Option<&'a str> {
        let start = self.rest.trim_start_matches(delims);
        if start.is_empty() {
            self.rest = start;
            return None;
        }

        match start.char_indices().find(|(_, c)| delims.contains(c)) {
            Some((end, delim)) => {
                self.rest = &start[end + delim.len_utf8()..];
                Some(&start[..end])
            }
            None => {
                self.rest = "";
                Some(start)
            }
        }
    }

    /// Text not consumed yet.
    pub fn rest(&self) -> &'a str {
        self.rest
    }

    /// Iterate the remaining tokens with a fixed delimiter set.
    pub fn tokens<'d>(self, delims: &'d [char]) -> Tokens<'a, 'd> {
        Tokens {
            cursor: self,
            delims,
        }
    }
}

/// Iterator returned by [`Tokenizer::tokens`].
#[derive(Debug, Clone)]
pub struct Tokens<'a, 'd> {
    cursor: Tokenizer<'a>,
    delims: &'d [char],
}

impl<'a> Iterator for Tokens<'a, '_> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.cursor.next_token(self.delims)
    }
}
