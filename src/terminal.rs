//! Terminal abstraction layer.
//!
//! [`Terminal`] is the seam between the engine and the real TTY: raw-mode
//! lifecycle, cursor visibility, size queries, frame writes, and raw input
//! chunks. [`StdioTerminal`] implements it over crossterm and the process's
//! stdin/stdout; tests substitute an in-memory fake.
//!
//! Resize notifications arrive as SIGWINCH and are latched into an atomic
//! flag, polled by the screen's event loop; signal handlers must not
//! touch locks or allocate.

use crossterm::{
    cursor, execute,
    terminal::{self, ClearType},
};
use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Terminal backend trait.
pub trait Terminal: Send {
    /// Get terminal size as `(columns, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Enter raw (non-canonical, non-echoing) mode.
    fn enter_raw_mode(&mut self) -> io::Result<()>;

    /// Leave raw mode.
    fn leave_raw_mode(&mut self) -> io::Result<()>;

    /// Hide the cursor.
    fn hide_cursor(&mut self) -> io::Result<()>;

    /// Show the cursor.
    fn show_cursor(&mut self) -> io::Result<()>;

    /// Clear the physical screen.
    fn clear(&mut self) -> io::Result<()>;

    /// Write one frame as a single write and flush it.
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()>;

    /// Wait up to `timeout` for one raw input chunk.
    ///
    /// A chunk is whatever one read returns; per the input contract it
    /// carries one decodable key. Returns `Ok(None)` on timeout.
    fn read_chunk(&mut self, timeout: Duration) -> io::Result<Option<Vec<u8>>>;
}

/// The real terminal: crossterm control sequences over stdout, raw byte
/// reads from stdin.
pub struct StdioTerminal {
    stdout: Stdout,
    raw_mode: bool,
    cursor_visible: bool,
}

impl StdioTerminal {
    /// A handle on the process's terminal. No modes are changed until the
    /// lifecycle methods are called.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            raw_mode: false,
            cursor_visible: true,
        }
    }
}

impl Default for StdioTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for StdioTerminal {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn enter_raw_mode(&mut self) -> io::Result<()> {
        if !self.raw_mode {
            terminal::enable_raw_mode()?;
            self.raw_mode = true;
        }
        Ok(())
    }

    fn leave_raw_mode(&mut self) -> io::Result<()> {
        if self.raw_mode {
            terminal::disable_raw_mode()?;
            self.raw_mode = false;
        }
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        if self.cursor_visible {
            execute!(self.stdout, cursor::Hide)?;
            self.cursor_visible = false;
        }
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        if !self.cursor_visible {
            execute!(self.stdout, cursor::Show)?;
            self.cursor_visible = true;
        }
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        execute!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )
    }

    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.stdout.write_all(frame)?;
        self.stdout.flush()
    }

    #[cfg(unix)]
    fn read_chunk(&mut self, timeout: Duration) -> io::Result<Option<Vec<u8>>> {
        if !poll_stdin(timeout)? {
            return Ok(None);
        }
        read_stdin()
    }

    #[cfg(not(unix))]
    fn read_chunk(&mut self, timeout: Duration) -> io::Result<Option<Vec<u8>>> {
        // Raw chunk reads are unix-only; elsewhere the host feeds keys
        // through `Screen::dispatch` directly.
        std::thread::sleep(timeout);
        Ok(None)
    }
}

impl Drop for StdioTerminal {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = self.show_cursor();
        let _ = self.leave_raw_mode();
    }
}

#[cfg(unix)]
fn poll_stdin(timeout: Duration) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;
    let rc = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    if rc < 0 {
        let err = io::Error::last_os_error();
        // A signal (e.g. SIGWINCH) interrupting the poll is not an error;
        // the loop picks the flag up on its next pass.
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    Ok(rc > 0 && fds.revents & libc::POLLIN != 0)
}

#[cfg(unix)]
fn read_stdin() -> io::Result<Option<Vec<u8>>> {
    let mut buf = [0u8; 64];
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(None);
        }
        return Err(err);
    }
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(buf[..n as usize].to_vec()))
}

/// Latched by the SIGWINCH handler, drained by the event loop.
static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

/// Guards one-time handler installation.
#[cfg(unix)]
static HANDLER_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install the SIGWINCH handler (unix; a no-op elsewhere). Idempotent.
pub fn install_resize_handler() {
    #[cfg(unix)]
    {
        if HANDLER_INSTALLED.swap(true, Ordering::SeqCst) {
            return;
        }
        let handler = on_sigwinch as extern "C" fn(libc::c_int);
        unsafe {
            libc::signal(libc::SIGWINCH, handler as libc::sighandler_t);
        }
    }
}

#[cfg(unix)]
extern "C" fn on_sigwinch(_signum: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::SeqCst);
}

/// Drain the pending-resize flag. Returns whether a resize was pending.
pub fn take_resize() -> bool {
    RESIZE_PENDING.swap(false, Ordering::SeqCst)
}

/// Best-effort terminal restoration for panic hooks and crash paths.
pub fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.write_all(b"\x1b[0m");
    let _ = stdout.flush();
}

/// Install a panic hook that restores terminal state before printing panic
/// info. Call once at application startup.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Restore the terminal BEFORE the panic message so it is readable.
        restore_terminal();
        original_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_terminal_never_panics() {
        restore_terminal();
    }

    #[test]
    fn resize_flag_drains_once() {
        RESIZE_PENDING.store(true, Ordering::SeqCst);
        assert!(take_resize());
        assert!(!take_resize());
    }

    #[test]
    fn install_resize_handler_is_idempotent() {
        install_resize_handler();
        install_resize_handler();
    }
}
