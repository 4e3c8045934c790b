//! The screen: raw-mode lifecycle, key dispatch and frame flushing.
//!
//! A [`Screen`] owns the root widget stack and a boxed [`Terminal`].
//! Construction hides the cursor and enters raw mode; the interrupt key
//! (or [`Screen::shutdown`]) is the only terminal transition and restores
//! both.
//!
//! # The event cycle
//!
//! [`Screen::run`] is a synchronous loop: read one raw chunk, decode it,
//! dispatch it to the most-recently-pushed widget that wants it, then
//! repaint if anything asked for it. Dispatch always runs to completion
//! before the next chunk is read.
//!
//! # Repaint requests and the single-writer rule
//!
//! Widget mutations (setters called from key handlers, or from the
//! continuation of some async operation a handler started) request
//! repaints through a non-owning [`RepaintHandle`]. The request itself is
//! synchronous and side-effect-only: it latches a dirty flag, and renders
//! immediately only when no dispatch/render cycle is in flight. The
//! screen's loop drains the flag once per iteration, so exactly one logical
//! owner ever serializes a frame.

use crate::input::{decode, Key};
use crate::render::{compose, ComposeError};
use crate::terminal::{self, StdioTerminal, Terminal};
use crate::trace;
use crate::widget::{SharedWidget, WidgetStack};
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

/// How long one loop iteration waits for input before checking the dirty
/// and resize flags.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Move the cursor to the origin; every frame starts with it.
const CURSOR_HOME: &str = "\x1b[H";

/// Error produced by screen operations.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    /// Compositing the widget stack failed.
    #[error("compositing failed: {0}")]
    Compose(#[from] ComposeError),
    /// Terminal I/O failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

struct Inner {
    stack: WidgetStack,
    term: Box<dyn Terminal>,
}

struct Shared {
    dirty: AtomicBool,
    busy: AtomicBool,
    shutdown: AtomicBool,
    inner: Mutex<Inner>,
}

impl Shared {
    fn render(&self) -> Result<(), ScreenError> {
        let mut inner = self.inner.lock();
        // Requests arriving from here on are for the *next* frame.
        self.dirty.store(false, Ordering::SeqCst);
        let (columns, rows) = inner.term.size()?;
        let grid = compose(inner.stack.iter(), columns, rows)?;

        let mut frame = String::with_capacity(
            CURSOR_HOME.len() + (columns as usize + 2) * rows as usize,
        );
        frame.push_str(CURSOR_HOME);
        for (i, row) in grid.ansi_rows().enumerate() {
            if i > 0 {
                frame.push_str("\r\n");
            }
            frame.push_str(&row);
        }
        inner.term.write_frame(frame.as_bytes())?;
        trace!("rendered {}x{} frame", columns, rows);
        Ok(())
    }

    fn request_render(&self) -> Result<(), ScreenError> {
        self.dirty.store(true, Ordering::SeqCst);
        if self.busy.load(Ordering::SeqCst) {
            // A dispatch/render cycle is in flight; its owner drains the
            // flag when it finishes.
            return Ok(());
        }
        self.render()
    }
}

/// A non-owning repaint requester handed to widgets at push time.
///
/// Cloning is cheap; a handle whose screen is gone (or that was never
/// attached) is a no-op. The handle must never be used to mutate widgets;
/// it only signals that already-mutated state wants to become visible.
#[derive(Clone)]
pub struct RepaintHandle {
    shared: Weak<Shared>,
}

impl RepaintHandle {
    /// A handle not connected to any screen; requests are no-ops.
    pub fn detached() -> Self {
        Self {
            shared: Weak::new(),
        }
    }

    /// Request a repaint. Renders synchronously when the screen is idle,
    /// otherwise coalesces into the in-flight cycle. Render errors surface
    /// to the caller that triggered the repaint.
    pub fn request(&self) -> Result<(), ScreenError> {
        match self.shared.upgrade() {
            Some(shared) => shared.request_render(),
            None => Ok(()),
        }
    }

    /// Whether a live screen is on the other end.
    pub fn is_attached(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl Default for RepaintHandle {
    fn default() -> Self {
        Self::detached()
    }
}

/// The top of the stack: a compositor bound to a terminal.
///
/// `Screen` is a cheap cloneable handle; clones share the same widget
/// stack and terminal.
#[derive(Clone)]
pub struct Screen {
    shared: Arc<Shared>,
}

impl Screen {
    /// Bind to the process's terminal: hides the cursor, enters raw mode
    /// and paints an initial (blank) frame.
    pub fn new() -> Result<Self, ScreenError> {
        Self::with_terminal(Box::new(StdioTerminal::new()))
    }

    /// Bind to a custom terminal (tests use an in-memory fake).
    pub fn with_terminal(mut term: Box<dyn Terminal>) -> Result<Self, ScreenError> {
        term.hide_cursor()?;
        term.enter_raw_mode()?;
        let screen = Self {
            shared: Arc::new(Shared {
                dirty: AtomicBool::new(false),
                busy: AtomicBool::new(false),
                shutdown: AtomicBool::new(false),
                inner: Mutex::new(Inner {
                    stack: WidgetStack::new(),
                    term,
                }),
            }),
        };
        screen.render()?;
        Ok(screen)
    }

    /// A repaint handle for this screen.
    pub fn repaint_handle(&self) -> RepaintHandle {
        RepaintHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Push a widget onto the stack: it paints above everything already
    /// there and gets first refusal on keys. The widget receives a repaint
    /// handle, and a repaint is requested. Re-pushing is a no-op.
    pub fn push(&self, widget: SharedWidget) -> Result<(), ScreenError> {
        let inserted = self.shared.inner.lock().stack.push(widget.clone());
        if inserted {
            widget.attach(self.repaint_handle());
        }
        self.shared.request_render()
    }

    /// Pop a widget by identity, clearing its repaint handle. Popping an
    /// absent widget is a no-op. Popping detaches rendering and key
    /// routing only; it cancels nothing the widget started.
    pub fn pop(&self, widget: &SharedWidget) -> Result<(), ScreenError> {
        let removed = self.shared.inner.lock().stack.pop(widget);
        if let Some(widget) = removed {
            widget.detach();
        }
        self.shared.request_render()
    }

    /// Composite the stack at the terminal's current size and flush it as
    /// one write.
    pub fn render(&self) -> Result<(), ScreenError> {
        self.shared.render()
    }

    /// Route one key to the stack: most-recently-pushed first, stopping at
    /// the first widget whose handler returns `true`. Unhandled keys are
    /// dropped. Returns whether any widget consumed the key.
    pub fn dispatch(&self, key: &Key) -> bool {
        // Handlers run without the screen lock so they can push, pop and
        // mutate freely; their repaints coalesce into this cycle.
        let widgets: Vec<SharedWidget> =
            self.shared.inner.lock().stack.top_down().cloned().collect();
        self.shared.busy.store(true, Ordering::SeqCst);
        let mut handled = false;
        for widget in &widgets {
            if widget.handle_key(key) {
                handled = true;
                break;
            }
        }
        self.shared.busy.store(false, Ordering::SeqCst);
        trace!("dispatched {:?}, handled: {}", key, handled);
        handled
    }

    /// The event loop: read, decode, dispatch, repaint; until the
    /// interrupt key or [`shutdown`](Self::shutdown). Restores the
    /// terminal on the way out.
    pub fn run(&self) -> Result<(), ScreenError> {
        terminal::install_resize_handler();
        self.render()?;
        while !self.shared.shutdown.load(Ordering::SeqCst) {
            let chunk = {
                let mut inner = self.shared.inner.lock();
                inner.term.read_chunk(POLL_INTERVAL)?
            };
            if let Some(bytes) = chunk {
                let key = decode(&bytes);
                if key == Key::Interrupt {
                    return self.close();
                }
                self.dispatch(&key);
            }
            if terminal::take_resize() {
                // Full repaint at the new dimensions; no diffing.
                self.shared.inner.lock().term.clear()?;
                self.render()?;
                continue;
            }
            if self.shared.dirty.swap(false, Ordering::SeqCst) {
                self.render()?;
            }
        }
        self.restore()
    }

    /// Ask a running loop to stop after its current iteration.
    pub fn shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
    }

    /// Restore the terminal after an interrupt, leaving a farewell note.
    fn close(&self) -> Result<(), ScreenError> {
        {
            let mut inner = self.shared.inner.lock();
            inner
                .term
                .write_frame(b"\x1b[H\x1b[31mInterrupted.\x1b[0m\r\n")?;
        }
        self.restore()
    }

    /// Restore cursor visibility and cooked mode.
    fn restore(&self) -> Result<(), ScreenError> {
        let mut inner = self.shared.inner.lock();
        inner.term.show_cursor()?;
        inner.term.leave_raw_mode()?;
        Ok(())
    }
}
