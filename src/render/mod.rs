//! Compositing pipeline: widget stack → positioned buffers → one grid.
//!
//! This module turns a z-ordered stack of widgets into a single
//! screen-sized [`Grid`]. The pipeline is deliberately simple and fully
//! repainted every pass:
//!
//! ```text
//! ┌──────────┐    ┌───────────────────┐    ┌──────────┐    ┌──────────┐
//! │  Widget  │ -> │ PositionedBuffer  │ -> │   Grid   │ -> │ Terminal │
//! │  stack   │    │ (escape-atomic    │    │  (cells) │    │  output  │
//! │          │    │  units + anchor)  │    │          │    │          │
//! └──────────┘    └───────────────────┘    └──────────┘    └──────────┘
//! ```
//!
//! Children are painted in push order and always in full: a later child
//! overwrites earlier cells (last writer wins), and nothing is culled for
//! occlusion. Content is cheap relative to a full terminal frame, and
//! correctness wins.
//!
//! # Errors
//!
//! Compositing fails loudly in exactly two cases: malformed style strings
//! ([`ScanError`] via a widget's render) and vertical overflow on an
//! [`Overflow::Fail`](crate::buffer::Overflow::Fail) buffer. Horizontal
//! misses are skipped silently by design.

mod cursor;
mod grid;

pub use cursor::GridCursor;
pub use grid::Grid;

use crate::buffer::PositionedBuffer;
use crate::span::ScanError;
use crate::widget::SharedWidget;

/// Error produced while compositing a widget stack into a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    /// A widget's content contained a malformed escape sequence.
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// Content on an overflow-fails buffer escaped the grid vertically.
    #[error("content overflowed a {columns}x{rows} grid vertically")]
    Overflow {
        /// Grid width the buffer was composited against.
        columns: u16,
        /// Grid height the buffer was composited against.
        rows: u16,
    },
}

/// Composite a widget stack, in push order, into a fresh grid.
pub fn compose<'a, I>(widgets: I, columns: u16, rows: u16) -> Result<Grid, ComposeError>
where
    I: IntoIterator<Item = &'a SharedWidget>,
{
    let mut grid = Grid::new(columns, rows);
    for widget in widgets {
        let buffer = widget.render()?;
        blit(&mut grid, &buffer)?;
    }
    Ok(grid)
}

/// Walk one buffer's units with a [`GridCursor`] and write them into the
/// grid.
///
/// Newline units never occupy a cell; they force a row move and a column
/// reset. A newline arriving right after the cursor row-wrapped at the
/// column boundary is absorbed: the line break already happened, and a
/// line that exactly fills the grid width must not skip a row. Units whose
/// cell falls outside the grid horizontally are skipped.
pub fn blit(grid: &mut Grid, buffer: &PositionedBuffer) -> Result<(), ComposeError> {
    let mut cursor = GridCursor::for_buffer(buffer, grid.columns(), grid.rows());
    let mut wrapped = false;
    for unit in buffer.units() {
        if unit.is_newline() {
            if !wrapped {
                cursor.newline();
            }
            wrapped = false;
            continue;
        }
        if cursor.overflowed() {
            return Err(ComposeError::Overflow {
                columns: grid.columns(),
                rows: grid.rows(),
            });
        }
        if let Some(index) = cursor.cell() {
            grid.set(index, unit.clone());
        }
        wrapped = cursor.advance();
    }
    Ok(())
}
