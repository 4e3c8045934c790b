//! Escape-atomic text units.
//!
//! Styled terminal text is a byte soup of ANSI SGR escape sequences and
//! payload characters. The compositor must never split an escape sequence
//! across grid cells, so this module re-expresses a string as a sequence of
//! indivisible [`StyledUnit`]s: one renderable character together with the
//! escape bytes that style it and the reset that terminates it.
//!
//! # Unit shapes
//!
//! - A plain character: no prefix, no reset.
//! - A styled character: one or more SGR sequences, the payload character,
//!   and a reset. If the source text carries its own reset immediately after
//!   the payload it is folded into the unit; otherwise the unit is marked as
//!   implicitly reset so style can never leak into the next unit.
//! - A newline: passed through unmodified, never styled, never reset. It is
//!   a control signal for the compositor ("advance row, reset column"), not
//!   cell content.
//!
//! # Example
//!
//! ```
//! use strata::span::UnitScanner;
//!
//! let units: Result<Vec<_>, _> = UnitScanner::new("\x1b[32mA\x1b[0mB").collect();
//! let units = units.unwrap();
//! assert_eq!(units.len(), 2);
//! assert_eq!(units[0].prefix(), "\x1b[32m");
//! assert_eq!(units[0].ch(), 'A');
//! assert_eq!(units[1].ch(), 'B');
//! ```

use smartstring::{LazyCompact, SmartString};
use std::fmt;

/// The escape introducer.
const ESC: char = '\x1b';

/// The SGR terminator; the character that defines "end of escape".
const SGR_TERMINATOR: char = 'm';

/// The minimal reset sequence. The fold lookahead window is exactly this
/// wide; any longer reset-like sequence is scanned as a separate unit.
pub const RESET: &str = "\x1b[0m";

/// Error produced while scanning styled text into units.
///
/// Both variants indicate corrupted style strings and are fatal to the
/// render call that encountered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// The input ended in the middle of an escape sequence.
    #[error("input ends inside an unterminated escape sequence")]
    UnterminatedEscape,
    /// An escape sequence terminated but no payload character followed.
    #[error("escape sequence has no payload character")]
    MissingPayload,
}

/// One indivisible renderable unit: a payload character plus the escape
/// bytes that style it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledUnit {
    prefix: SmartString<LazyCompact>,
    ch: char,
    reset: bool,
}

impl StyledUnit {
    /// A plain, unstyled unit.
    pub fn plain(ch: char) -> Self {
        Self {
            prefix: SmartString::new(),
            ch,
            reset: false,
        }
    }

    /// The payload character.
    #[inline]
    pub fn ch(&self) -> char {
        self.ch
    }

    /// The escape bytes preceding the payload; empty for plain units.
    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether the unit terminates with a reset (folded from the source or
    /// implicit).
    #[inline]
    pub fn has_reset(&self) -> bool {
        self.reset
    }

    /// Whether this unit is the row-advance control signal.
    #[inline]
    pub fn is_newline(&self) -> bool {
        self.ch == '\n'
    }

    /// Whether any escape bytes precede the payload.
    #[inline]
    pub fn is_styled(&self) -> bool {
        !self.prefix.is_empty()
    }
}

impl fmt::Display for StyledUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)?;
        write!(f, "{}", self.ch)?;
        if self.reset {
            f.write_str(RESET)?;
        }
        Ok(())
    }
}

/// Lazy, finite, non-restartable iterator over the units of a string,
/// left-to-right.
///
/// Yields `Result` items: a malformed escape (unterminated, or terminated
/// with nothing after it) ends the iteration with a [`ScanError`], and the
/// unconsumed tail stays available through [`UnitScanner::rest`].
pub struct UnitScanner<'a> {
    rest: &'a str,
    failed: bool,
}

impl<'a> UnitScanner<'a> {
    /// Start scanning `input` from its first byte.
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            failed: false,
        }
    }

    /// The unconsumed remainder. Non-empty only after a scan error.
    pub fn rest(&self) -> &'a str {
        self.rest
    }

    fn fail(&mut self, start: &'a str, err: ScanError) -> Option<Result<StyledUnit, ScanError>> {
        self.rest = start;
        self.failed = true;
        Some(Err(err))
    }
}

impl Iterator for UnitScanner<'_> {
    type Item = Result<StyledUnit, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        let start = self.rest;

        // Consecutive escape sequences accumulate into one prefix, so
        // "\x1b[1m\x1b[32mX" stays a single unit.
        let mut prefix = SmartString::new();
        while self.rest.starts_with(ESC) {
            match self.rest.find(SGR_TERMINATOR) {
                Some(end) => {
                    prefix.push_str(&self.rest[..=end]);
                    self.rest = &self.rest[end + 1..];
                }
                None => return self.fail(start, ScanError::UnterminatedEscape),
            }
        }

        let mut chars = self.rest.chars();
        let Some(ch) = chars.next() else {
            return self.fail(start, ScanError::MissingPayload);
        };
        self.rest = chars.as_str();

        // Newlines are control signals: no style wrapper, no reset.
        if ch == '\n' {
            return Some(Ok(StyledUnit {
                prefix,
                ch,
                reset: false,
            }));
        }

        // Fold an immediately-following reset into this unit; otherwise a
        // styled unit gets an implicit reset so style never leaks.
        let reset = match self.rest.strip_prefix(RESET) {
            Some(stripped) => {
                self.rest = stripped;
                true
            }
            None => !prefix.is_empty(),
        };

        Some(Ok(StyledUnit { prefix, ch, reset }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Vec<StyledUnit> {
        UnitScanner::new(input)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(UnitScanner::new("").count(), 0);
    }

    #[test]
    fn plain_text_splits_per_char() {
        let units = scan("abc");
        assert_eq!(units.len(), 3);
        assert_eq!(units[0], StyledUnit::plain('a'));
        assert!(!units[1].is_styled());
        assert!(!units[2].has_reset());
    }

    #[test]
    fn styled_char_gets_implicit_reset() {
        let units = scan("\x1b[32mAB");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].prefix(), "\x1b[32m");
        assert_eq!(units[0].ch(), 'A');
        assert!(units[0].has_reset());
        assert_eq!(units[0].to_string(), "\x1b[32mA\x1b[0m");
        // Style never leaks: B is plain.
        assert_eq!(units[1], StyledUnit::plain('B'));
    }

    #[test]
    fn source_reset_is_folded_not_duplicated() {
        let units = scan("\x1b[31mX\x1b[0m");
        assert_eq!(units.len(), 1);
        assert!(units[0].has_reset());
        assert_eq!(units[0].to_string(), "\x1b[31mX\x1b[0m");
    }

    #[test]
    fn reset_folds_into_plain_char_too() {
        let units = scan("B\x1b[0m");
        assert_eq!(units.len(), 1);
        assert!(!units[0].is_styled());
        assert!(units[0].has_reset());
    }

    #[test]
    fn consecutive_escapes_accumulate() {
        let units = scan("\x1b[1m\x1b[32mZ\x1b[0m");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].prefix(), "\x1b[1m\x1b[32m");
        assert_eq!(units[0].ch(), 'Z');
    }

    #[test]
    fn newline_passes_through_unstyled() {
        let units = scan("a\nb");
        assert_eq!(units.len(), 3);
        assert!(units[1].is_newline());
        assert!(!units[1].has_reset());
        assert_eq!(units[1].to_string(), "\n");
    }

    #[test]
    fn newline_never_gets_reset_folded() {
        // The reset after the newline belongs to the next unit's prefix.
        let units = scan("\n\x1b[0mx");
        assert_eq!(units.len(), 2);
        assert!(units[0].is_newline());
        assert_eq!(units[1].prefix(), "\x1b[0m");
        assert_eq!(units[1].ch(), 'x');
    }

    #[test]
    fn unterminated_escape_is_an_error() {
        let mut scanner = UnitScanner::new("ok\x1b[32");
        assert!(scanner.next().unwrap().is_ok());
        assert!(scanner.next().unwrap().is_ok());
        assert_eq!(
            scanner.next().unwrap(),
            Err(ScanError::UnterminatedEscape)
        );
        // Iteration fuses; the malformed tail is preserved.
        assert!(scanner.next().is_none());
        assert_eq!(scanner.rest(), "\x1b[32");
    }

    #[test]
    fn escape_without_payload_is_an_error() {
        let mut scanner = UnitScanner::new("\x1b[31m");
        assert_eq!(scanner.next().unwrap(), Err(ScanError::MissingPayload));
        assert_eq!(scanner.rest(), "\x1b[31m");
    }

    #[test]
    fn reconstruction_round_trips() {
        let input = "\x1b[1mB\x1b[0mplain\x1b[32mG";
        let rebuilt: String = scan(input).iter().map(ToString::to_string).collect();
        // Every visible char keeps its styling; resets are explicit at unit
        // boundaries.
        assert_eq!(rebuilt, "\x1b[1mB\x1b[0mplain\x1b[32mG\x1b[0m");
    }

    #[test]
    fn multibyte_payloads_stay_intact() {
        let units = scan("\x1b[33m✓");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].ch(), '✓');
    }
}
