//! Grid cursor: anchor resolution and movement rules.

use crate::buffer::{Flow, Overflow, PositionedBuffer};

/// A cursor over a fixed `columns × rows` grid.
///
/// Construction resolves the anchor's sign convention (`x < 0` means
/// `columns + x`, so `-1` is the last column; same for `y` and rows).
/// [`advance`](Self::advance) steps one cell in the horizontal fill
/// direction; crossing a column boundary resets to the anchor column and
/// moves one row in the vertical fill direction (the row-wrap rule).
///
/// Vertical moves that would leave the grid either clamp
/// ([`Overflow::Wrap`]) or latch the [`overflowed`](Self::overflowed) flag
/// ([`Overflow::Fail`]); the flag is checked by the compositor when the
/// *next* unit needs a cell, so content that exactly fills the grid never
/// trips it.
#[derive(Debug, Clone)]
pub struct GridCursor {
    x: i32,
    y: i32,
    anchor_x: i32,
    columns: i32,
    rows: i32,
    vertical: Flow,
    horizontal: Flow,
    overflow: Overflow,
    overflowed: bool,
}

impl GridCursor {
    /// Resolve `(x, y)` against a `columns × rows` grid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: i32,
        y: i32,
        columns: u16,
        rows: u16,
        vertical: Flow,
        horizontal: Flow,
        overflow: Overflow,
    ) -> Self {
        let columns = i32::from(columns);
        let rows = i32::from(rows);
        let x = if x < 0 { columns + x } else { x };
        let y = if y < 0 { rows + y } else { y };
        Self {
            x,
            y,
            anchor_x: x,
            columns,
            rows,
            vertical,
            horizontal,
            overflow,
            overflowed: false,
        }
    }

    /// A cursor configured from a buffer's anchor, flows and policy.
    pub fn for_buffer(buffer: &PositionedBuffer, columns: u16, rows: u16) -> Self {
        let (x, y) = buffer.anchor();
        Self::new(
            x,
            y,
            columns,
            rows,
            buffer.vertical_flow(),
            buffer.horizontal_flow(),
            buffer.overflow_policy(),
        )
    }

    /// Current position. May sit outside the grid transiently; such cells
    /// are horizontal misses, not errors.
    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Whether a vertical move under [`Overflow::Fail`] has left the grid.
    #[inline]
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Linear cell index under the cursor, or `None` when the cursor is
    /// outside `[0, columns) × [0, rows)`.
    pub fn cell(&self) -> Option<usize> {
        if (0..self.columns).contains(&self.x) && (0..self.rows).contains(&self.y) {
            Some((self.y * self.columns + self.x) as usize)
        } else {
            None
        }
    }

    /// Move one cell in the horizontal fill direction, row-wrapping at the
    /// column boundary. Returns whether a row wrap happened, so the
    /// compositor can absorb a newline unit that follows one (the line
    /// break already took place).
    pub fn advance(&mut self) -> bool {
        match self.horizontal {
            Flow::Forward => {
                self.x += 1;
                if self.x >= self.columns {
                    self.row_wrap();
                    return true;
                }
            }
            Flow::Backward => {
                self.x -= 1;
                if self.x < 0 {
                    self.row_wrap();
                    return true;
                }
            }
        }
        false
    }

    /// Force a row move in the vertical fill direction and reset the column
    /// to the anchor column, regardless of the current column.
    pub fn newline(&mut self) {
        self.row_wrap();
    }

    fn row_wrap(&mut self) {
        self.x = self.anchor_x;
        match self.vertical {
            Flow::Forward => {
                self.y += 1;
                if self.y >= self.rows {
                    self.y = self.rows - 1;
                    if self.overflow == Overflow::Fail {
                        self.overflowed = true;
                    }
                }
            }
            Flow::Backward => {
                self.y -= 1;
                if self.y < 0 {
                    self.y = 0;
                    if self.overflow == Overflow::Fail {
                        self.overflowed = true;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(x: i32, y: i32, columns: u16, rows: u16) -> GridCursor {
        GridCursor::new(
            x,
            y,
            columns,
            rows,
            Flow::Forward,
            Flow::Forward,
            Overflow::Wrap,
        )
    }

    #[test]
    fn negative_anchor_resolves_to_far_edge() {
        let cursor = cursor(-1, -1, 10, 3);
        assert_eq!(cursor.position(), (9, 2));
    }

    #[test]
    fn minus_one_is_always_last_column() {
        for columns in 1..=80u16 {
            let cursor = cursor(-1, 0, columns, 1);
            assert_eq!(cursor.position().0, i32::from(columns) - 1);
        }
    }

    #[test]
    fn forward_advance_wraps_to_anchor_column() {
        let mut cursor = cursor(2, 0, 4, 3);
        cursor.advance(); // x = 3
        cursor.advance(); // boundary: back to anchor, next row
        assert_eq!(cursor.position(), (2, 1));
    }

    #[test]
    fn backward_advance_wraps_in_the_vertical_flow() {
        let mut cursor = GridCursor::new(
            0,
            1,
            4,
            3,
            Flow::Backward,
            Flow::Backward,
            Overflow::Wrap,
        );
        cursor.advance();
        assert_eq!(cursor.position(), (0, 0));
    }

    #[test]
    fn newline_resets_column_regardless_of_position() {
        let mut cursor = cursor(3, 0, 10, 3);
        cursor.advance();
        cursor.newline();
        assert_eq!(cursor.position(), (3, 1));
    }

    #[test]
    fn wrap_policy_clamps_to_last_row() {
        let mut cursor = cursor(0, 2, 4, 3);
        cursor.newline();
        assert_eq!(cursor.position(), (0, 2));
        assert!(!cursor.overflowed());
        // Further advances are absorbed on the boundary row.
        cursor.newline();
        assert_eq!(cursor.position(), (0, 2));
    }

    #[test]
    fn fail_policy_latches_on_overflow() {
        let mut cursor = GridCursor::new(
            0,
            2,
            4,
            3,
            Flow::Forward,
            Flow::Forward,
            Overflow::Fail,
        );
        cursor.newline();
        assert!(cursor.overflowed());
    }

    #[test]
    fn fail_policy_latches_on_upward_overflow() {
        let mut cursor = GridCursor::new(
            0,
            0,
            4,
            3,
            Flow::Backward,
            Flow::Forward,
            Overflow::Fail,
        );
        cursor.newline();
        assert!(cursor.overflowed());
    }

    #[test]
    fn out_of_range_column_is_a_miss_not_an_error() {
        // Anchor beyond the left edge: cells miss until the cursor walks
        // into range.
        let mut cursor = cursor(-6, 0, 4, 2);
        assert_eq!(cursor.position(), (-2, 0));
        assert!(cursor.cell().is_none());
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.cell(), Some(0));
    }

    #[test]
    fn linear_index_is_row_major() {
        let cursor = cursor(2, 1, 5, 3);
        assert_eq!(cursor.cell(), Some(7));
    }
}
