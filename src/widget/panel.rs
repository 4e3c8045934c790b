//! The `Panel` widget: a nested compositor.

use crate::buffer::{Overflow, PositionedBuffer};
use crate::input::Key;
use crate::render::{compose, ComposeError};
use crate::screen::{RepaintHandle, ScreenError};
use crate::widget::{SharedWidget, Widget, WidgetStack};
use parking_lot::Mutex;
use std::sync::Arc;

/// A compositor that is itself a widget.
///
/// A panel owns a fixed `columns × rows` grid and a stack of children. On
/// render it composites the children into its own grid and exposes the
/// serialized grid as its buffer content, so panels nest to any depth. Key
/// dispatch delegates to the children most-recently-pushed first, keeping
/// the single-handler contract recursive.
///
/// A panel owns its children's lifecycle registration (push/pop), never
/// their content. Note that the panel's grid is written in full, blanks
/// included: a panel overdraws everything beneath its rectangle.
pub struct Panel {
    state: Mutex<PanelState>,
}

struct PanelState {
    x: i32,
    y: i32,
    columns: u16,
    rows: u16,
    overflow: Overflow,
    stack: WidgetStack,
    repaint: RepaintHandle,
}

impl Panel {
    /// A new empty panel of the given size anchored at `(x, y)`.
    pub fn new(x: i32, y: i32, columns: u16, rows: u16) -> Self {
        Self {
            state: Mutex::new(PanelState {
                x,
                y,
                columns,
                rows,
                overflow: Overflow::Wrap,
                stack: WidgetStack::new(),
                repaint: RepaintHandle::detached(),
            }),
        }
    }

    /// Overflow policy for this panel's content in its parent grid.
    pub fn overflow(mut self, policy: Overflow) -> Self {
        self.state.get_mut().overflow = policy;
        self
    }

    /// Finish building and make the panel shareable.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Push a child widget and request a repaint. Re-pushing a present
    /// child is a no-op.
    pub fn push(&self, widget: SharedWidget) -> Result<(), ScreenError> {
        let (inserted, repaint) = {
            let mut state = self.state.lock();
            (state.stack.push(widget.clone()), state.repaint.clone())
        };
        if inserted {
            widget.attach(repaint.clone());
        }
        repaint.request()
    }

    /// Pop a child by identity and request a repaint. Popping an absent
    /// child is a no-op.
    pub fn pop(&self, widget: &SharedWidget) -> Result<(), ScreenError> {
        let (removed, repaint) = {
            let mut state = self.state.lock();
            (state.stack.pop(widget), state.repaint.clone())
        };
        if let Some(widget) = removed {
            widget.detach();
        }
        repaint.request()
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.state.lock().stack.len()
    }

    /// Whether the panel has no children.
    pub fn is_empty(&self) -> bool {
        self.state.lock().stack.is_empty()
    }

    fn children_top_down(&self) -> Vec<SharedWidget> {
        self.state.lock().stack.top_down().cloned().collect()
    }

    fn children_bottom_up(&self) -> Vec<SharedWidget> {
        self.state.lock().stack.iter().cloned().collect()
    }
}

impl Widget for Panel {
    fn position(&self) -> (i32, i32) {
        let state = self.state.lock();
        (state.x, state.y)
    }

    fn render(&self) -> Result<PositionedBuffer, ComposeError> {
        let (x, y, columns, rows, overflow) = {
            let state = self.state.lock();
            (
                state.x,
                state.y,
                state.columns,
                state.rows,
                state.overflow,
            )
        };
        // Children render outside the panel lock; a child is free to be a
        // panel again.
        let children = self.children_bottom_up();
        let grid = compose(children.iter(), columns, rows)?;
        Ok(PositionedBuffer::new(x, y, &grid.to_ansi())?.overflow(overflow))
    }

    fn handle_key(&self, key: &Key) -> bool {
        self.children_top_down()
            .iter()
            .any(|child| child.handle_key(key))
    }

    fn attach(&self, repaint: RepaintHandle) {
        let children = {
            let mut state = self.state.lock();
            state.repaint = repaint.clone();
            state.stack.iter().cloned().collect::<Vec<_>>()
        };
        for child in children {
            child.attach(repaint.clone());
        }
    }

    fn detach(&self) {
        let children = {
            let mut state = self.state.lock();
            state.repaint = RepaintHandle::detached();
            state.stack.iter().cloned().collect::<Vec<_>>()
        };
        for child in children {
            child.detach();
        }
    }
}
