//! # strata
//!
//! A stack-compositing terminal UI engine: a z-ordered stack of
//! independently-updatable widgets, painted into a fixed-size character
//! grid and synchronized with raw keyboard input.
//!
//! ```text
//! ┌──────────┐    ┌───────────────────┐    ┌──────────┐    ┌──────────┐
//! │  Widget  │ -> │ PositionedBuffer  │ -> │   Grid   │ -> │ Terminal │
//! │  stack   │    │ (anchored units)  │    │  (cells) │    │  (1 write)│
//! └──────────┘    └───────────────────┘    └──────────┘    └──────────┘
//!       ^                                                        │
//!       │             raw bytes -> Key -> dispatch               │
//!       └────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine's load-bearing guarantees:
//!
//! - **Escape-atomic compositing** - styled text is split into indivisible
//!   units ([`span`]), so overlapping widgets never corrupt a color escape
//!   sequence, no matter how they overdraw each other.
//! - **Edge-relative anchors** - negative widget coordinates resolve
//!   against the far edge of the grid at render time, so the same widget
//!   works across terminal resizes.
//! - **Loud or silent overflow, by choice** - a buffer either clamps
//!   vertically ([`buffer::Overflow::Wrap`]) or fails the render call
//!   ([`buffer::Overflow::Fail`]).
//! - **Single-pass key routing** - one key reaches at most one widget,
//!   most-recently-pushed first ([`screen`]).
//!
//! # Example
//!
//! ```no_run
//! use strata::screen::Screen;
//! use strata::widget::Text;
//!
//! fn main() -> Result<(), strata::screen::ScreenError> {
//!     let screen = Screen::new()?;
//!     let status = Text::new(0, -1, "ready").shared();
//!     screen.push(status.clone())?;
//!     screen.run()
//! }
//! ```
//!
//! The engine is synchronous and single-owner by design: handlers and
//! continuations mutate widgets and *request* repaints; the screen's loop
//! is the only thing that serializes frames. See [`screen`] for the exact
//! contract.

pub mod buffer;
pub mod components;
pub mod input;
pub mod render;
pub mod screen;
pub mod span;
pub mod style;
pub mod terminal;
pub mod widget;

pub use buffer::{Flow, Overflow, PositionedBuffer};
pub use input::{decode, Key};
pub use render::{compose, ComposeError, Grid};
pub use screen::{RepaintHandle, Screen, ScreenError};
pub use span::{ScanError, StyledUnit, UnitScanner};
pub use style::{Color, Style};
pub use widget::{Panel, SharedWidget, Text, Widget};

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($arg:tt)*) => { tracing::trace!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

pub(crate) use trace;
