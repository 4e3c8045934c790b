//! SGR styling helpers.
//!
//! The engine itself never interprets the meaning of escape bytes; this
//! module is the other side of that contract. It *produces* styled text in
//! the one shape the engine guarantees to composite losslessly: every
//! payload character carries its own escape prefix and reset. Styles are
//! applied per [`StyledUnit`](crate::span::StyledUnit), so styling
//! already-styled text nests instead of splitting escape sequences.
//!
//! # Example
//!
//! ```
//! use strata::style::{Color, Style};
//!
//! let ok = Style::new().fg(Color::Green).bold().apply("OK");
//! assert_eq!(ok, "\x1b[1;32mO\x1b[0m\x1b[1;32mK\x1b[0m");
//! ```

use crate::span::{UnitScanner, RESET};
use std::fmt::Write as _;

/// Terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Terminal default.
    Default,
    /// Black.
    Black,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Yellow.
    Yellow,
    /// Blue.
    Blue,
    /// Magenta.
    Magenta,
    /// Cyan.
    Cyan,
    /// White.
    White,
    /// Bright black (gray).
    BrightBlack,
    /// Bright red.
    BrightRed,
    /// Bright green.
    BrightGreen,
    /// Bright yellow.
    BrightYellow,
    /// Bright blue.
    BrightBlue,
    /// Bright magenta.
    BrightMagenta,
    /// Bright cyan.
    BrightCyan,
    /// Bright white.
    BrightWhite,
    /// 256-color palette index.
    Ansi256(u8),
    /// True color (24-bit RGB).
    Rgb(u8, u8, u8),
}

impl Color {
    fn push_params(self, out: &mut String, base: u8, extended: u8) {
        match self {
            Self::Default => push_code(out, base + 9),
            Self::Black => push_code(out, base),
            Self::Red => push_code(out, base + 1),
            Self::Green => push_code(out, base + 2),
            Self::Yellow => push_code(out, base + 3),
            Self::Blue => push_code(out, base + 4),
            Self::Magenta => push_code(out, base + 5),
            Self::Cyan => push_code(out, base + 6),
            Self::White => push_code(out, base + 7),
            Self::BrightBlack => push_code(out, base + 60),
            Self::BrightRed => push_code(out, base + 61),
            Self::BrightGreen => push_code(out, base + 62),
            Self::BrightYellow => push_code(out, base + 63),
            Self::BrightBlue => push_code(out, base + 64),
            Self::BrightMagenta => push_code(out, base + 65),
            Self::BrightCyan => push_code(out, base + 66),
            Self::BrightWhite => push_code(out, base + 67),
            Self::Ansi256(n) => {
                let _ = write!(out, "{};5;{}", extended, n);
            }
            Self::Rgb(r, g, b) => {
                let _ = write!(out, "{};2;{};{};{}", extended, r, g, b);
            }
        }
    }

    fn push_fg_params(self, out: &mut String) {
        self.push_params(out, 30, 38);
    }

    fn push_bg_params(self, out: &mut String) {
        self.push_params(out, 40, 48);
    }
}

fn push_code(out: &mut String, code: u8) {
    let _ = write!(out, "{}", code);
}

/// Parse a `#rrggbb` hex color (leading `#` optional, full length required).
pub fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// A combination of SGR attributes, applied per unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
    dim: bool,
    italic: bool,
    underline: bool,
    inverse: bool,
    strikethrough: bool,
}

impl Style {
    /// An empty style; [`apply`](Self::apply) with it is the identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the foreground color.
    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Dim / faint.
    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    /// Italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Underline.
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Inverse / reverse video.
    pub fn inverse(mut self) -> Self {
        self.inverse = true;
        self
    }

    /// Strikethrough.
    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    fn is_plain(self) -> bool {
        self == Self::default()
    }

    /// The combined SGR sequence for this style, empty when plain.
    pub fn sgr(self) -> String {
        if self.is_plain() {
            return String::new();
        }
        let mut params = String::new();
        let mut sep = |out: &mut String| {
            if !out.is_empty() {
                out.push(';');
            }
        };
        for (on, code) in [
            (self.bold, 1u8),
            (self.dim, 2),
            (self.italic, 3),
            (self.underline, 4),
            (self.inverse, 7),
            (self.strikethrough, 9),
        ] {
            if on {
                sep(&mut params);
                push_code(&mut params, code);
            }
        }
        if let Some(fg) = self.fg {
            sep(&mut params);
            fg.push_fg_params(&mut params);
        }
        if let Some(bg) = self.bg {
            sep(&mut params);
            bg.push_bg_params(&mut params);
        }
        format!("\x1b[{params}m")
    }

    /// Apply this style to every unit of `text`.
    ///
    /// Existing escape prefixes are kept after the new one, so inner styles
    /// win over outer ones; newline units pass through untouched. A
    /// malformed escape tail is passed through verbatim; the strict check
    /// belongs to the render path.
    pub fn apply(self, text: &str) -> String {
        if self.is_plain() {
            return text.to_string();
        }
        let sgr = self.sgr();
        let mut out = String::with_capacity(text.len() * 2);
        let mut scanner = UnitScanner::new(text);
        for unit in scanner.by_ref() {
            match unit {
                Ok(unit) if unit.is_newline() => out.push_str(&unit.to_string()),
                Ok(unit) => {
                    out.push_str(&sgr);
                    out.push_str(unit.prefix());
                    out.push(unit.ch());
                    out.push_str(RESET);
                }
                Err(_) => break,
            }
        }
        out.push_str(scanner.rest());
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn plain_style_is_identity() {
        assert_eq!(Style::new().apply("hello\nworld"), "hello\nworld");
    }

    #[test]
    fn every_unit_is_self_terminating() {
        let out = Style::new().fg(Color::Red).apply("ab");
        assert_eq!(out, "\x1b[31ma\x1b[0m\x1b[31mb\x1b[0m");
    }

    #[test]
    fn attributes_combine_into_one_sequence() {
        let sgr = Style::new().bold().underline().fg(Color::Green).sgr();
        assert_eq!(sgr, "\x1b[1;4;32m");
    }

    #[test]
    fn nested_styles_keep_inner_wins_order() {
        let inner = Style::new().fg(Color::Red).apply("x");
        let out = Style::new().inverse().apply(&inner);
        // Outer code first, inner after: the inner color overrides.
        assert_eq!(out, "\x1b[7m\x1b[31mx\x1b[0m");
    }

    #[test]
    fn newlines_are_never_wrapped() {
        let out = Style::new().fg(Color::Cyan).apply("a\nb");
        assert_eq!(out, "\x1b[36ma\x1b[0m\n\x1b[36mb\x1b[0m");
    }

    #[test]
    fn extended_colors_emit_extended_params() {
        assert_eq!(Style::new().fg(Color::Ansi256(123)).sgr(), "\x1b[38;5;123m");
        assert_eq!(
            Style::new().bg(Color::Rgb(255, 128, 64)).sgr(),
            "\x1b[48;2;255;128;64m"
        );
    }

    #[test]
    fn default_color_emits_reset_to_default() {
        assert_eq!(Style::new().fg(Color::Default).sgr(), "\x1b[39m");
        assert_eq!(Style::new().bg(Color::Default).sgr(), "\x1b[49m");
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex("#ff8040"), Some(Color::Rgb(255, 128, 64)));
        assert_eq!(parse_hex("00ff00"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("zzzzzz"), None);
    }

    #[test]
    fn malformed_tail_passes_through() {
        let out = Style::new().bold().apply("a\x1b[3");
        assert_eq!(out, "\x1b[1ma\x1b[0m\x1b[3");
    }
}
