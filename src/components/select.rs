//! Vertical choice menu component.

use crate::buffer::PositionedBuffer;
use crate::input::Key;
use crate::render::ComposeError;
use crate::screen::{RepaintHandle, ScreenError};
use crate::style::{Color, Style};
use crate::widget::Widget;
use parking_lot::Mutex;
use std::sync::Arc;

type SubmitHandler = Box<dyn FnMut(Option<usize>) + Send>;

/// A header plus a vertical list of choices, one highlighted.
///
/// While active, arrow keys move the highlight (skipping disabled entries
/// in the direction of travel), enter submits `Some(index)` and escape
/// submits `None`.
pub struct Select {
    state: Mutex<SelectState>,
}

struct SelectState {
    x: i32,
    y: i32,
    header: String,
    choices: Vec<String>,
    selected: usize,
    disabled: Vec<usize>,
    active: bool,
    on_submit: Option<SubmitHandler>,
    repaint: RepaintHandle,
}

impl Select {
    /// A new inactive menu at `(x, y)`.
    pub fn new(x: i32, y: i32, header: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            state: Mutex::new(SelectState {
                x,
                y,
                header: header.into(),
                choices,
                selected: 0,
                disabled: Vec::new(),
                active: false,
                on_submit: None,
                repaint: RepaintHandle::detached(),
            }),
        }
    }

    /// Start with a specific choice highlighted.
    pub fn selected(mut self, index: usize) -> Self {
        let state = self.state.get_mut();
        state.selected = index;
        seek_enabled(state, 1);
        self
    }

    /// Indexes that cannot be selected.
    pub fn disabled(mut self, indexes: Vec<usize>) -> Self {
        let state = self.state.get_mut();
        state.disabled = indexes;
        seek_enabled(state, 1);
        self
    }

    /// Completion callback: `Some(index)` on enter, `None` on escape.
    pub fn on_submit(mut self, handler: impl FnMut(Option<usize>) + Send + 'static) -> Self {
        self.state.get_mut().on_submit = Some(Box::new(handler));
        self
    }

    /// Finish building and make the menu shareable.
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

    /// The highlighted index.
    pub fn selected_index(&self) -> usize {
        self.state.lock().selected
    }

    /// Whether the menu currently captures keys.
    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Replace the choice list and request a repaint. The highlight is
    /// clamped and moved off disabled entries.
    pub fn set_choices(&self, choices: Vec<String>) -> Result<(), ScreenError> {
        let repaint = {
            let mut state = self.state.lock();
            state.choices = choices;
            state.selected = state.selected.min(state.choices.len().saturating_sub(1));
            seek_enabled(&mut state, 1);
            state.repaint.clone()
        };
        repaint.request()
    }

    /// Replace the disabled set and request a repaint.
    pub fn set_disabled(&self, indexes: Vec<usize>) -> Result<(), ScreenError> {
        let repaint = {
            let mut state = self.state.lock();
            state.disabled = indexes;
            seek_enabled(&mut state, 1);
            state.repaint.clone()
        };
        repaint.request()
    }

    fn submit(&self, choice: Option<usize>) {
        let handler = self.state.lock().on_submit.take();
        if let Some(mut handler) = handler {
            handler(choice);
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

/// Move `selected` off disabled entries by scanning in `step` direction
/// (±1), wrapping around. Leaves the state untouched when every choice is
/// disabled.
fn seek_enabled(state: &mut SelectState, step: isize) {
    let len = state.choices.len();
    if len == 0 || state.disabled.len() >= len {
        return;
    }
    let mut index = state.selected.min(len - 1);
    while state.disabled.contains(&index) {
        index = (index as isize + step).rem_euclid(len as isize) as usize;
    }
    state.selected = index;
}

impl Widget for Select {
    fn position(&self) -> (i32, i32) {
        let state = self.state.lock();
        (state.x, state.y)
    }

    fn render(&self) -> Result<PositionedBuffer, ComposeError> {
        let state = self.state.lock();
        let mut lines = Vec::with_capacity(state.choices.len() + 1);
        lines.push(Style::new().fg(Color::Green).underline().apply(&state.header));
        for (index, choice) in state.choices.iter().enumerate() {
            let style = if state.disabled.contains(&index) {
                Style::new().fg(Color::BrightBlack)
            } else if index == state.selected {
                Style::new().fg(Color::Black).bg(Color::Green)
            } else {
                Style::new().fg(Color::Green)
            };
            lines.push(style.apply(choice));
        }
        Ok(PositionedBuffer::new(state.x, state.y, &lines.join("\n"))?)
    }

    fn handle_key(&self, key: &Key) -> bool {
        if !self.state.lock().active {
            return false;
        }
        match key {
            Key::ArrowUp => {
                {
                    let mut state = self.state.lock();
                    state.selected = state.selected.saturating_sub(1);
                    seek_enabled(&mut state, -1);
                }
                self.request_repaint();
                true
            }
            Key::ArrowDown => {
                {
                    let mut state = self.state.lock();
                    let last = state.choices.len().saturating_sub(1);
                    state.selected = (state.selected + 1).min(last);
                    seek_enabled(&mut state, 1);
                }
                self.request_repaint();
                true
            }
            Key::Enter => {
                let choice = {
                    let mut state = self.state.lock();
                    state.active = false;
                    state.selected
                };
                self.submit(Some(choice));
                self.request_repaint();
                true
            }
            Key::Escape => {
                self.state.lock().active = false;
                self.submit(None);
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use parking_lot::Mutex as PlMutex;

    fn menu(choices: &[&str]) -> Select {
        Select::new(
            0,
            0,
            "Pick one",
            choices.iter().map(|c| (*c).to_string()).collect(),
        )
    }

    #[test]
    fn arrows_move_the_highlight_within_bounds() {
        let select = menu(&["a", "b", "c"]);
        select.activate().unwrap();
        assert!(select.handle_key(&Key::ArrowDown));
        assert_eq!(select.selected_index(), 1);
        select.handle_key(&Key::ArrowDown);
        select.handle_key(&Key::ArrowDown);
        assert_eq!(select.selected_index(), 2);
        select.handle_key(&Key::ArrowUp);
        select.handle_key(&Key::ArrowUp);
        select.handle_key(&Key::ArrowUp);
        assert_eq!(select.selected_index(), 0);
    }

    #[test]
    fn disabled_entries_are_skipped_in_travel_direction() {
        let select = menu(&["a", "b", "c"]).disabled(vec![1]);
        select.activate().unwrap();
        select.handle_key(&Key::ArrowDown);
        assert_eq!(select.selected_index(), 2);
        select.handle_key(&Key::ArrowUp);
        assert_eq!(select.selected_index(), 0);
    }

    #[test]
    fn initial_selection_moves_off_disabled() {
        let select = menu(&["a", "b", "c"]).disabled(vec![0]);
        assert_eq!(select.selected_index(), 1);
    }

    #[test]
    fn all_disabled_leaves_selection_alone() {
        let select = menu(&["a", "b"]).disabled(vec![0, 1]);
        assert_eq!(select.selected_index(), 0);
    }

    #[test]
    fn enter_submits_the_index() {
        let submitted: Arc<PlMutex<Option<Option<usize>>>> = Arc::new(PlMutex::new(None));
        let seen = submitted.clone();
        let select = menu(&["a", "b"]).on_submit(move |choice| *seen.lock() = Some(choice));
        select.activate().unwrap();
        select.handle_key(&Key::ArrowDown);
        assert!(select.handle_key(&Key::Enter));
        assert_eq!(*submitted.lock(), Some(Some(1)));
        assert!(!select.is_active());
    }

    #[test]
    fn escape_submits_none() {
        let submitted: Arc<PlMutex<Option<Option<usize>>>> = Arc::new(PlMutex::new(None));
        let seen = submitted.clone();
        let select = menu(&["a"]).on_submit(move |choice| *seen.lock() = Some(choice));
        select.activate().unwrap();
        assert!(select.handle_key(&Key::Escape));
        assert_eq!(*submitted.lock(), Some(None));
    }

    #[test]
    fn inactive_menu_refuses_keys() {
        let select = menu(&["a", "b"]);
        assert!(!select.handle_key(&Key::ArrowDown));
        assert_eq!(select.selected_index(), 0);
    }

    #[test]
    fn renders_header_and_choices_as_lines() {
        let select = menu(&["yes", "no"]);
        let buffer = select.render().unwrap();
        let plain: String = buffer.units().iter().map(|u| u.ch()).collect();
        assert_eq!(plain, "Pick one\nyes\nno");
    }

    #[test]
    fn selected_line_is_highlighted() {
        let select = menu(&["yes", "no"]);
        let buffer = select.render().unwrap();
        // Units: header(8) + newline + "yes".
        let y = &buffer.units()[9];
        assert!(y.prefix().contains("42"));
    }
}
