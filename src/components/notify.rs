//! Notification stack component.

use crate::buffer::{Flow, PositionedBuffer};
use crate::input::Key;
use crate::render::ComposeError;
use crate::screen::{RepaintHandle, ScreenError};
use crate::style::{Color, Style};
use crate::widget::Widget;
use parking_lot::Mutex;
use std::sync::Arc;

/// A bounded stack of transient messages.
///
/// Renders the newest message on the anchor row and older ones above it
/// (vertical backward fill), up to `limit` messages. Pushing a message
/// equal to the newest one bumps a `[n×]` counter instead of stacking a
/// duplicate line.
///
/// Expiry is cooperative: the engine runs no timers, so the owner calls
/// [`expire_oldest`](Self::expire_oldest) on whatever schedule it likes,
/// typically from the continuation of a sleep it manages itself.
pub struct Notices {
    state: Mutex<NoticeState>,
}

struct NoticeState {
    x: i32,
    y: i32,
    limit: usize,
    messages: Vec<(String, u32)>,
    repaint: RepaintHandle,
}

impl Notices {
    /// A new, empty notification area anchored at the bottom-left corner,
    /// holding at most 10 messages.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(NoticeState {
                x: 0,
                y: -1,
                limit: 10,
                messages: Vec::new(),
                repaint: RepaintHandle::detached(),
            }),
        }
    }

    /// Move the anchor.
    pub fn position(mut self, x: i32, y: i32) -> Self {
        let state = self.state.get_mut();
        state.x = x;
        state.y = y;
        self
    }

    /// Maximum number of messages displayed at once.
    pub fn limit(mut self, limit: usize) -> Self {
        self.state.get_mut().limit = limit;
        self
    }

    /// Finish building and make the notification area shareable.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Push a message. A repeat of the newest message bumps its counter.
    pub fn push(&self, message: impl Into<String>) -> Result<(), ScreenError> {
        let repaint = {
            let mut state = self.state.lock();
            let message = message.into();
            match state.messages.last_mut() {
                Some((last, count)) if *last == message => *count += 1,
                _ => state.messages.push((message, 1)),
            }
            state.repaint.clone()
        };
        repaint.request()
    }

    /// Push a red, bold-prefixed error message.
    pub fn push_error(&self, error: impl AsRef<str>) -> Result<(), ScreenError> {
        let prefix = Style::new().bold().apply("Error:");
        self.push(Style::new().fg(Color::Red).apply(&format!(
            "{} {}",
            prefix,
            error.as_ref()
        )))
    }

    /// Push a green, bold-prefixed success message.
    pub fn push_success(&self, message: impl AsRef<str>) -> Result<(), ScreenError> {
        let prefix = Style::new().bold().apply("Success:");
        self.push(Style::new().fg(Color::Green).apply(&format!(
            "{} {}",
            prefix,
            message.as_ref()
        )))
    }

    /// Expire the oldest message: decrement its counter, removing it when
    /// the counter reaches zero. A no-op when empty.
    pub fn expire_oldest(&self) -> Result<(), ScreenError> {
        let repaint = {
            let mut state = self.state.lock();
            if !state.messages.is_empty() {
                if state.messages[0].1 > 1 {
                    state.messages[0].1 -= 1;
                } else {
                    state.messages.remove(0);
                }
            }
            state.repaint.clone()
        };
        repaint.request()
    }

    /// Drop all messages.
    pub fn clear(&self) -> Result<(), ScreenError> {
        let repaint = {
            let mut state = self.state.lock();
            state.messages.clear();
            state.repaint.clone()
        };
        repaint.request()
    }

    /// Number of distinct messages currently held.
    pub fn len(&self) -> usize {
        self.state.lock().messages.len()
    }

    /// Whether no messages are held.
    pub fn is_empty(&self) -> bool {
        self.state.lock().messages.is_empty()
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Notices {
    fn position(&self) -> (i32, i32) {
        let state = self.state.lock();
        (state.x, state.y)
    }

    fn render(&self) -> Result<PositionedBuffer, ComposeError> {
        let state = self.state.lock();
        let lines: Vec<String> = state
            .messages
            .iter()
            .rev()
            .take(state.limit)
            .map(|(message, count)| {
                if *count > 1 {
                    let suffix = Style::new()
                        .fg(Color::BrightBlack)
                        .apply(&format!("[{count}x]"));
                    format!("{message} {suffix}")
                } else {
                    message.clone()
                }
            })
            .collect();
        Ok(PositionedBuffer::new(state.x, state.y, &lines.join("\n"))?
            .vertical(Flow::Backward))
    }

    fn handle_key(&self, _key: &Key) -> bool {
        false
    }

    fn attach(&self, repaint: RepaintHandle) {
        self.state.lock().repaint = repaint;
    }

    fn detach(&self) {
        self.state.lock().repaint = RepaintHandle::detached();
    }
}
