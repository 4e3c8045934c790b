//! Built-in UI components.
//!
//! Ready-to-use widgets built purely on the widget capability and the key
//! token vocabulary; nothing here has privileged access to the engine.
//!
//! - [`TextInput`] - single-line prompt with placeholder, validation and a
//!   display transform
//! - [`Select`] - vertical choice menu with disabled entries
//! - [`Notices`] - bounded notification stack with duplicate counters
//!
//! Interactive components are *activated* to capture keys and report
//! completion through an `on_submit` callback; while inactive they render
//! but refuse all keys, so whatever sits above them on the stack is free to
//! consume input.

mod notify;
mod select;
mod text_input;

pub use notify::Notices;
pub use select::Select;
pub use text_input::TextInput;
