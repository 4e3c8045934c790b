//! Single-line text input component.

use crate::buffer::PositionedBuffer;
use crate::input::Key;
use crate::render::ComposeError;
use crate::screen::{RepaintHandle, ScreenError};
use crate::style::{Color, Style};
use crate::widget::Widget;
use parking_lot::Mutex;
use std::sync::Arc;

type SubmitHandler = Box<dyn FnMut(Option<&str>) + Send>;
type Validator = Box<dyn Fn(&str) -> bool + Send>;
type DisplayMap = Box<dyn Fn(&str) -> String + Send>;

/// A prompt with an editable value.
///
/// Renders a styled header above (or inline with) the current value; shows
/// the placeholder while the value is empty, and renders everything inverse
/// while active. Keys are only consumed while active:
///
/// - printable literals append, backspace deletes
/// - enter deactivates and submits `Some(value)`
/// - escape deactivates and submits `None`
pub struct TextInput {
    state: Mutex<InputState>,
}

struct InputState {
    x: i32,
    y: i32,
    header: String,
    value: String,
    placeholder: String,
    inline_header: bool,
    active: bool,
    is_valid: Validator,
    display: DisplayMap,
    on_submit: Option<SubmitHandler>,
    repaint: RepaintHandle,
}

impl TextInput {
    /// A new inactive input at `(x, y)` with the given header question.
    pub fn new(x: i32, y: i32, header: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(InputState {
                x,
                y,
                header: header.into(),
                value: String::new(),
                placeholder: String::new(),
                inline_header: false,
                active: false,
                is_valid: Box::new(|_| true),
                display: Box::new(str::to_string),
                on_submit: None,
                repaint: RepaintHandle::detached(),
            }),
        }
    }

    /// Placeholder shown while the value is empty.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.state.get_mut().placeholder = placeholder.into();
        self
    }

    /// Start with a value already present.
    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.state.get_mut().value = value.into();
        self
    }

    /// Render the header on the same line as the value.
    pub fn inline_header(mut self) -> Self {
        self.state.get_mut().inline_header = true;
        self
    }

    /// Invalid values render red instead of white.
    pub fn validate_with(mut self, is_valid: impl Fn(&str) -> bool + Send + 'static) -> Self {
        self.state.get_mut().is_valid = Box::new(is_valid);
        self
    }

    /// Transform the value for display only (e.g. mask a password).
    pub fn display_with(mut self, display: impl Fn(&str) -> String + Send + 'static) -> Self {
        self.state.get_mut().display = Box::new(display);
        self
    }

    /// Completion callback: `Some(value)` on enter, `None` on escape.
    pub fn on_submit(mut self, handler: impl FnMut(Option<&str>) + Send + 'static) -> Self {
        self.state.get_mut().on_submit = Some(Box::new(handler));
        self
    }

    /// Finish building and make the input shareable.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Begin capturing keys.
    pub fn activate(&self) -> Result<(), ScreenError> {
        let repaint = {
            let mut state = self.state.lock();
            state.active = true;
            state.repaint.clone()
        };
        repaint.request()
    }

    /// The current value.
    pub fn value(&self) -> String {
        self.state.lock().value.clone()
    }

    /// Whether the input currently captures keys.
    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Replace the value and request a repaint.
    pub fn set_value(&self, value: impl Into<String>) -> Result<(), ScreenError> {
        let repaint = {
            let mut state = self.state.lock();
            state.value = value.into();
            state.repaint.clone()
        };
        repaint.request()
    }

    /// Replace the header question and request a repaint.
    pub fn set_header(&self, header: impl Into<String>) -> Result<(), ScreenError> {
        let repaint = {
            let mut state = self.state.lock();
            state.header = header.into();
            state.repaint.clone()
        };
        repaint.request()
    }

    fn submit(&self, value: Option<String>) {
        // The callback runs without the lock: it may pop this widget or
        // mutate it.
        let handler = self.state.lock().on_submit.take();
        if let Some(mut handler) = handler {
            handler(value.as_deref());
            let mut state = self.state.lock();
            if state.on_submit.is_none() {
                state.on_submit = Some(handler);
            }
        }
    }

    fn request_repaint(&self) {
        let repaint = self.state.lock().repaint.clone();
        if let Err(err) = repaint.request() {
            crate::trace!("repaint after key handling failed: {}", err);
        }
    }
}

impl Widget for TextInput {
    fn position(&self) -> (i32, i32) {
        let state = self.state.lock();
        (state.x, state.y)
    }

    fn render(&self) -> Result<PositionedBuffer, ComposeError> {
        let state = self.state.lock();
        let header = Style::new()
            .fg(Color::Green)
            .underline()
            .apply(&state.header);
        let body = if state.value.is_empty() {
            Style::new().fg(Color::BrightBlack).apply(&state.placeholder)
        } else {
            let shown = (state.display)(&state.value);
            let style = if (state.is_valid)(&state.value) {
                Style::new().fg(Color::White)
            } else {
                Style::new().fg(Color::Red)
            };
            style.apply(&shown)
        };
        let separator = if state.inline_header { " " } else { "\n" };
        let mut text = format!("{header}{separator}{body}");
        if state.active {
            text = Style::new().inverse().apply(&text);
        }
        Ok(PositionedBuffer::new(state.x, state.y, &text)?)
    }

    fn handle_key(&self, key: &Key) -> bool {
        if !self.state.lock().active {
            return false;
        }
        match key {
            Key::Backspace => {
                self.state.lock().value.pop();
                self.request_repaint();
                true
            }
            Key::Enter => {
                let value = {
                    let mut state = self.state.lock();
                    state.active = false;
                    state.value.clone()
                };
                self.submit(Some(value));
                self.request_repaint();
                true
            }
            Key::Escape => {
                self.state.lock().active = false;
                self.submit(None);
                self.request_repaint();
                true
            }
            Key::Literal(chunk) => {
                let typed: String = chunk.chars().filter(|c| !c.is_control()).collect();
                if typed.is_empty() {
                    return false;
                }
                self.state.lock().value.push_str(&typed);
                self.request_repaint();
                true
            }
            _ => false,
        }
    }

    fn attach(&self, repaint: RepaintHandle) {
        self.state.lock().repaint = repaint;
    }

    fn detach(&self) {
        self.state.lock().repaint = RepaintHandle::detached();
    }
}
