//! The `Text` leaf widget.

use crate::buffer::{Flow, Overflow, PositionedBuffer};
use crate::input::Key;
use crate::render::ComposeError;
use crate::screen::{RepaintHandle, ScreenError};
use crate::widget::Widget;
use parking_lot::Mutex;
use std::sync::Arc;

type KeyHandler = Box<dyn FnMut(&Key) -> bool + Send>;

/// A leaf widget rendering literal (possibly styled) content.
///
/// The content is exclusively owned by the leaf and changed through
/// explicit setters; every setter requests a repaint through the non-owning
/// handle received at push time. An optional key-handler closure makes a
/// `Text` interactive without a new widget type.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use strata::widget::Text;
///
/// let status = Arc::new(Text::new(0, -1, "ready"));
/// // ... screen.push(status.clone()) ...
/// status.set_text("loading").unwrap();
/// ```
pub struct Text {
    state: Mutex<TextState>,
}

struct TextState {
    x: i32,
    y: i32,
    content: String,
    vertical: Flow,
    horizontal: Flow,
    overflow: Overflow,
    repaint: RepaintHandle,
    on_key: Option<KeyHandler>,
}

impl Text {
    /// A new leaf at `(x, y)` with the given content.
    pub fn new(x: i32, y: i32, content: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(TextState {
                x,
                y,
                content: content.into(),
                vertical: Flow::Forward,
                horizontal: Flow::Forward,
                overflow: Overflow::Wrap,
                repaint: RepaintHandle::detached(),
                on_key: None,
            }),
        }
    }

    /// Set the vertical fill direction.
    pub fn vertical(mut self, flow: Flow) -> Self {
        self.state.get_mut().vertical = flow;
        self
    }

    /// Set the horizontal fill direction.
    ///
    /// # Panics
    ///
    /// Panics if `flow` is [`Flow::Backward`] and the content spans
    /// multiple lines.
    pub fn horizontal(mut self, flow: Flow) -> Self {
        let state = self.state.get_mut();
        assert!(
            flow == Flow::Forward || !state.content.contains('\n'),
            "backward horizontal fill requires single-line content"
        );
        state.horizontal = flow;
        self
    }

    /// Set the vertical overflow policy.
    pub fn overflow(mut self, policy: Overflow) -> Self {
        self.state.get_mut().overflow = policy;
        self
    }

    /// Install a key handler. The leaf consumes a key exactly when the
    /// handler returns `true`.
    pub fn on_key(mut self, handler: impl FnMut(&Key) -> bool + Send + 'static) -> Self {
        self.state.get_mut().on_key = Some(Box::new(handler));
        self
    }

    /// Finish building and make the leaf shareable.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// The current content.
    pub fn text(&self) -> String {
        self.state.lock().content.clone()
    }

    /// Replace the content and request a repaint.
    ///
    /// # Panics
    ///
    /// Panics if the leaf uses backward horizontal fill and `content`
    /// spans multiple lines. The violation surfaces here, at the mutation
    /// site, not at render time.
    pub fn set_text(&self, content: impl Into<String>) -> Result<(), ScreenError> {
        let repaint = {
            let mut state = self.state.lock();
            let content = content.into();
            assert!(
                state.horizontal == Flow::Forward || !content.contains('\n'),
                "backward horizontal fill requires single-line content"
            );
            state.content = content;
            state.repaint.clone()
        };
        repaint.request()
    }

    /// Move the anchor and request a repaint.
    pub fn set_position(&self, x: i32, y: i32) -> Result<(), ScreenError> {
        let repaint = {
            let mut state = self.state.lock();
            state.x = x;
            state.y = y;
            state.repaint.clone()
        };
        repaint.request()
    }

    /// Replace the key handler.
    pub fn set_on_key(&self, handler: impl FnMut(&Key) -> bool + Send + 'static) {
        self.state.lock().on_key = Some(Box::new(handler));
    }

    /// Remove the key handler.
    pub fn clear_on_key(&self) {
        self.state.lock().on_key = None;
    }
}

impl Widget for Text {
    fn position(&self) -> (i32, i32) {
        let state = self.state.lock();
        (state.x, state.y)
    }

    fn render(&self) -> Result<PositionedBuffer, ComposeError> {
        let state = self.state.lock();
        Ok(PositionedBuffer::new(state.x, state.y, &state.content)?
            .vertical(state.vertical)
            .horizontal(state.horizontal)
            .overflow(state.overflow))
    }

    fn handle_key(&self, key: &Key) -> bool {
        // The handler runs without the state lock so it can freely call
        // setters on this same leaf.
        let Some(mut handler) = self.state.lock().on_key.take() else {
            return false;
        };
        let handled = handler(key);
        let mut state = self.state.lock();
        if state.on_key.is_none() {
            state.on_key = Some(handler);
        }
        handled
    }

    fn attach(&self, repaint: RepaintHandle) {
        self.state.lock().repaint = repaint;
    }

    fn detach(&self) {
        self.state.lock().repaint = RepaintHandle::detached();
    }
}
