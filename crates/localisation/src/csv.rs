//! Streaming CSV reader for localisation tables.
//!
//! Character-at-a-time state machine rather than a grammar: fields are
//! separated by commas, records by any unescaped newline, and a field may be
//! delimited by double or single quotes with doubled-delimiter escaping.
//! Embedded commas and newlines inside a quoted field are part of the value.
//!
//! Malformed-input policy (deliberately lenient, never an error):
//! - EOF inside a quoted field terminates the field with the content read
//!   so far, and the partial record is still emitted.
//! - Records are yielded with whatever column count they have; shaping rows
//!   against a header is the caller's concern.

use std::str::Chars;

/// Pull iterator over CSV records.
///
/// Single pass over the input, not restartable. Each record is the ordered
/// list of its fields. Blank lines (no fields at all) are skipped, including
/// a trailing newline at end of input; a trailing record without a final
/// newline is still emitted.
pub struct CsvRows<'a> {
    chars: Chars<'a>,
    peeked: Option<char>,
}

impl<'a> CsvRows<'a> {
    /// Create a reader over the given CSV text.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
            peeked: None,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        self.peeked.take().or_else(|| self.chars.next())
    }

    fn push_back(&mut self, c: char) {
        self.peeked = Some(c);
    }

    /// Consume a quoted field body after its opening delimiter.
    ///
    /// A doubled delimiter inside the field is an escaped literal; the first
    /// undoubled delimiter closes the field. EOF closes the field too.
    fn read_quoted(&mut self, delimiter: char, field: &mut String) {
        while let Some(c) = self.next_char() {
            if c == delimiter {
                match self.next_char() {
                    Some(next) if next == delimiter => field.push(delimiter),
                    Some(next) => {
                        self.push_back(next);
                        return;
                    }
                    None => return,
                }
            } else {
                field.push(c);
            }
        }
    }
}

impl Iterator for CsvRows<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Vec<String>> {
        let mut fields: Vec<String> = Vec::new();
        let mut field = String::new();
        // True once any character has contributed to the current record,
        // so a bare newline is recognised as a blank line, not a record.
        let mut started = false;

        while let Some(c) = self.next_char() {
            match c {
                ',' => {
                    started = true;
                    fields.push(std::mem::take(&mut field));
                }
                '\r' | '\n' => {
                    if c == '\r'
                        && let Some(next) = self.next_char()
                        && next != '\n'
                    {
                        self.push_back(next);
                    }
                    if started {
                        fields.push(field);
                        return Some(fields);
                    }
                    // Blank line: keep scanning for the next record.
                }
                '"' | '\'' => {
                    started = true;
                    self.read_quoted(c, &mut field);
                }
                other => {
                    started = true;
                    field.push(other);
                }
            }
        }

        // EOF flushes a pending partial record.
        if started {
            fields.push(field);
            return Some(fields);
        }
        None
    }
}
