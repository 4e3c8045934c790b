//! Raw input decoding.
//!
//! [`decode`] maps one raw input chunk (the bytes delivered by a single
//! read from a raw-mode stdin) to one semantic [`Key`] token. The function
//! is total: every possible byte sequence yields some token, falling back to
//! [`Key::Literal`], because it sits directly in the input hot path and must
//! never fail.

use smartstring::{LazyCompact, SmartString};

/// A semantic key token.
///
/// The set is closed from the decoder's point of view but marked
/// `#[non_exhaustive]`: widgets must treat tokens they do not recognize as
/// unhandled rather than erroring.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow (`ESC [ A`).
    ArrowUp,
    /// Down arrow (`ESC [ B`).
    ArrowDown,
    /// Left arrow (`ESC [ D`).
    ArrowLeft,
    /// Right arrow (`ESC [ C`).
    ArrowRight,
    /// Carriage return.
    Enter,
    /// Bare escape byte.
    Escape,
    /// Horizontal tab.
    Tab,
    /// Back-tab (`ESC [ Z`).
    ReverseTab,
    /// Delete-backwards.
    Backspace,
    /// Ctrl-C.
    Interrupt,
    /// Anything else, carrying the decoded character(s).
    Literal(SmartString<LazyCompact>),
}

impl Key {
    /// The payload character when this is a single-character literal.
    pub fn literal(&self) -> Option<char> {
        match self {
            Self::Literal(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Decode one raw input chunk into a key token.
///
/// # Example
///
/// ```
/// use strata::input::{decode, Key};
///
/// assert_eq!(decode(&[0x1b, b'[', b'A']), Key::ArrowUp);
/// assert_eq!(decode(b"a"), Key::Literal("a".into()));
/// ```
pub fn decode(bytes: &[u8]) -> Key {
    match bytes {
        [0x1b, b'[', b'A'] => Key::ArrowUp,
        [0x1b, b'[', b'B'] => Key::ArrowDown,
        [0x1b, b'[', b'C'] => Key::ArrowRight,
        [0x1b, b'[', b'D'] => Key::ArrowLeft,
        [0x1b, b'[', b'Z'] => Key::ReverseTab,
        [0x03] => Key::Interrupt,
        [0x09] => Key::Tab,
        [0x0d] => Key::Enter,
        [0x1b] => Key::Escape,
        [0x7f] => Key::Backspace,
        _ => Key::Literal(String::from_utf8_lossy(bytes).into_owned().into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_sequences_decode() {
        assert_eq!(decode(&[27, 91, 65]), Key::ArrowUp);
        assert_eq!(decode(&[27, 91, 66]), Key::ArrowDown);
        assert_eq!(decode(&[27, 91, 67]), Key::ArrowRight);
        assert_eq!(decode(&[27, 91, 68]), Key::ArrowLeft);
    }

    #[test]
    fn control_bytes_decode() {
        assert_eq!(decode(&[3]), Key::Interrupt);
        assert_eq!(decode(&[9]), Key::Tab);
        assert_eq!(decode(&[13]), Key::Enter);
        assert_eq!(decode(&[27]), Key::Escape);
        assert_eq!(decode(&[127]), Key::Backspace);
        assert_eq!(decode(&[27, 91, 90]), Key::ReverseTab);
    }

    #[test]
    fn printable_byte_is_literal() {
        assert_eq!(decode(b"a"), Key::Literal("a".into()));
        assert_eq!(decode(b"a").literal(), Some('a'));
    }

    #[test]
    fn multibyte_chunk_is_literal() {
        let key = decode("é".as_bytes());
        assert_eq!(key, Key::Literal("é".into()));
        assert_eq!(key.literal(), Some('é'));
    }

    #[test]
    fn multi_char_literal_has_no_single_char() {
        assert_eq!(decode(b"ab").literal(), None);
    }

    #[test]
    fn invalid_utf8_still_decodes() {
        // Totality: garbage bytes become a replacement-character literal.
        let key = decode(&[0xff, 0xfe]);
        assert!(matches!(key, Key::Literal(_)));
    }

    #[test]
    fn unknown_escape_sequence_is_literal() {
        // Not in the table (Home key on some terminals).
        assert!(matches!(decode(&[27, 91, 72]), Key::Literal(_)));
    }
}
