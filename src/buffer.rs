//! Positioned, alignment-aware content buffers.
//!
//! A [`PositionedBuffer`] is what a widget hands to the compositor: its
//! content pre-scanned into escape-atomic units, an anchor position, the
//! fill direction for each axis, and the policy for vertical overflow.
//! Negative anchor coordinates mean "measured from the far edge of the
//! owning grid" and are resolved at composite time, because the same buffer
//! configuration may be painted onto grids of different sizes over its
//! lifetime.

use crate::span::{ScanError, StyledUnit, UnitScanner};

/// Direction content grows along an axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Flow {
    /// Rightward / downward.
    #[default]
    Forward,
    /// Leftward / upward.
    Backward,
}

/// Policy for content that would leave the grid vertically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overflow {
    /// Clamp to the boundary row; surplus content is silently absorbed.
    /// For decorative panels where loss is acceptable.
    #[default]
    Wrap,
    /// Fail the render call loudly. For panels where silent truncation of
    /// user-visible data is worse than an error.
    Fail,
}

/// A widget's renderable content, anchored and direction-aware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedBuffer {
    x: i32,
    y: i32,
    vertical: Flow,
    horizontal: Flow,
    overflow: Overflow,
    units: Vec<StyledUnit>,
    multiline: bool,
}

impl PositionedBuffer {
    /// Scan `content` into units and anchor it at `(x, y)`.
    ///
    /// Defaults: forward fill on both axes, [`Overflow::Wrap`]. Malformed
    /// escape sequences in `content` surface here as a [`ScanError`].
    pub fn new(x: i32, y: i32, content: &str) -> Result<Self, ScanError> {
        let units = UnitScanner::new(content).collect::<Result<Vec<_>, _>>()?;
        let multiline = units.iter().any(StyledUnit::is_newline);
        Ok(Self {
            x,
            y,
            vertical: Flow::Forward,
            horizontal: Flow::Forward,
            overflow: Overflow::Wrap,
            units,
            multiline,
        })
    }

    /// Set the vertical fill direction.
    pub fn vertical(mut self, flow: Flow) -> Self {
        self.vertical = flow;
        self
    }

    /// Set the horizontal fill direction. Backward fill reverses the unit
    /// order here, at construction time.
    ///
    /// # Panics
    ///
    /// Panics if `flow` is [`Flow::Backward`] and the content spans multiple
    /// lines; backward fill is only defined for single-line content.
    pub fn horizontal(mut self, flow: Flow) -> Self {
        assert!(
            flow == Flow::Forward || !self.multiline,
            "backward horizontal fill requires single-line content"
        );
        if flow != self.horizontal {
            self.units.reverse();
            self.horizontal = flow;
        }
        self
    }

    /// Set the vertical overflow policy.
    pub fn overflow(mut self, policy: Overflow) -> Self {
        self.overflow = policy;
        self
    }

    /// The anchor position; negative coordinates resolve against the far
    /// edge of the grid at composite time.
    #[inline]
    pub fn anchor(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// The vertical fill direction.
    #[inline]
    pub fn vertical_flow(&self) -> Flow {
        self.vertical
    }

    /// The horizontal fill direction.
    #[inline]
    pub fn horizontal_flow(&self) -> Flow {
        self.horizontal
    }

    /// The vertical overflow policy.
    #[inline]
    pub fn overflow_policy(&self) -> Overflow {
        self.overflow
    }

    /// The content units, already reversed for backward horizontal fill.
    #[inline]
    pub fn units(&self) -> &[StyledUnit] {
        &self.units
    }

    /// Whether the content contains newline units.
    #[inline]
    pub fn is_multiline(&self) -> bool {
        self.multiline
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_forward_wrap() {
        let buf = PositionedBuffer::new(2, 3, "hi").unwrap();
        assert_eq!(buf.anchor(), (2, 3));
        assert_eq!(buf.vertical_flow(), Flow::Forward);
        assert_eq!(buf.horizontal_flow(), Flow::Forward);
        assert_eq!(buf.overflow_policy(), Overflow::Wrap);
        assert_eq!(buf.units().len(), 2);
    }

    #[test]
    fn backward_horizontal_reverses_units() {
        let buf = PositionedBuffer::new(-1, 0, "OK")
            .unwrap()
            .horizontal(Flow::Backward);
        let chars: Vec<char> = buf.units().iter().map(|u| u.ch()).collect();
        assert_eq!(chars, vec!['K', 'O']);
    }

    #[test]
    fn reversal_keeps_units_atomic() {
        let buf = PositionedBuffer::new(0, 0, "\x1b[31mA\x1b[0mB")
            .unwrap()
            .horizontal(Flow::Backward);
        assert_eq!(buf.units()[0].ch(), 'B');
        assert_eq!(buf.units()[1].ch(), 'A');
        assert_eq!(buf.units()[1].prefix(), "\x1b[31m");
    }

    #[test]
    fn setting_backward_twice_does_not_double_reverse() {
        let buf = PositionedBuffer::new(0, 0, "ab")
            .unwrap()
            .horizontal(Flow::Backward)
            .horizontal(Flow::Backward);
        assert_eq!(buf.units()[0].ch(), 'b');
    }

    #[test]
    #[should_panic(expected = "single-line")]
    fn backward_multiline_is_a_contract_violation() {
        let _ = PositionedBuffer::new(0, 0, "a\nb")
            .unwrap()
            .horizontal(Flow::Backward);
    }

    #[test]
    fn malformed_content_fails_construction() {
        assert!(PositionedBuffer::new(0, 0, "x\x1b[3").is_err());
    }

    #[test]
    fn multiline_detection() {
        assert!(PositionedBuffer::new(0, 0, "a\nb").unwrap().is_multiline());
        assert!(!PositionedBuffer::new(0, 0, "ab").unwrap().is_multiline());
    }
}
