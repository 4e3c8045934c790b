//! The widget capability and the z-ordered widget stack.
//!
//! Anything that can be pushed onto a [`Screen`](crate::screen::Screen) or
//! a [`Panel`] implements [`Widget`]: it has an anchor position, renders to
//! a [`PositionedBuffer`], and may opt into key handling. The key handler
//! is a default trait method returning `false` rather than a runtime type
//! probe; widgets that don't care simply never see keys.
//!
//! Widgets are shared as `Arc<dyn Widget>` and use interior mutability;
//! identity (the `Arc` allocation) is what push/pop operate on.

mod panel;
mod text;

pub use panel::Panel;
pub use text::Text;

use crate::buffer::PositionedBuffer;
use crate::input::Key;
use crate::render::ComposeError;
use crate::screen::RepaintHandle;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;

/// The widget capability.
pub trait Widget: Send + Sync {
    /// The anchor position; negative coordinates are measured from the far
    /// edge of the owning grid at render time.
    fn position(&self) -> (i32, i32);

    /// Produce this widget's positioned content for one composite pass.
    fn render(&self) -> Result<PositionedBuffer, ComposeError>;

    /// React to a key token. Return `true` to consume the key and stop the
    /// dispatch walk. Widgets must treat unrecognized tokens as unhandled.
    fn handle_key(&self, _key: &Key) -> bool {
        false
    }

    /// Receive a non-owning repaint handle when pushed onto a screen.
    ///
    /// The handle exists solely to request repaints after mutations; it is
    /// cleared again on pop and must never be used to mutate the widget.
    fn attach(&self, _repaint: RepaintHandle) {}

    /// Drop the repaint handle; called when the widget is popped.
    fn detach(&self) {}
}

/// A shared, identity-tracked widget.
pub type SharedWidget = Arc<dyn Widget>;

fn identity(widget: &SharedWidget) -> usize {
    Arc::as_ptr(widget).cast::<()>() as usize
}

/// An ordered widget stack: paint order is push order, key dispatch walks
/// it in reverse.
///
/// Backed by an insertion-ordered map keyed on widget identity, so
/// pop-by-identity is a lookup rather than a scan. A widget may be pushed
/// at most once at a time: re-pushing is a no-op, as is popping a widget
/// that is not present.
#[derive(Default)]
pub struct WidgetStack {
    entries: IndexMap<usize, SharedWidget, FxBuildHasher>,
}

impl WidgetStack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a widget. Returns `false` if it was already present.
    pub fn push(&mut self, widget: SharedWidget) -> bool {
        let key = identity(&widget);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, widget);
        true
    }

    /// Remove a widget by identity, preserving the order of the rest.
    /// Returns the removed widget, or `None` if it was not present.
    pub fn pop(&mut self, widget: &SharedWidget) -> Option<SharedWidget> {
        self.entries.shift_remove(&identity(widget))
    }

    /// Whether the widget is currently on the stack.
    pub fn contains(&self, widget: &SharedWidget) -> bool {
        self.entries.contains_key(&identity(widget))
    }

    /// Widgets in paint order (first pushed first).
    pub fn iter(&self) -> impl Iterator<Item = &SharedWidget> {
        self.entries.values()
    }

    /// Widgets in dispatch order (most recently pushed first).
    pub fn top_down(&self) -> impl Iterator<Item = &SharedWidget> {
        self.entries.values().rev()
    }

    /// Number of widgets on the stack.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
