#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! [`TerminalSession`] enters raw mode, the alternate screen, and mouse
//! capture, and hides the cursor. Dropping it undoes each step in reverse
//! order. A panic hook runs the same cleanup first, so a release build with
//! `panic = "abort"` still leaves a usable terminal.

use std::io::{self, Write};
use std::sync::OnceLock;

use crossterm::{cursor, event, execute, terminal};

/// Which terminal features the session enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub alternate_screen: bool,
    pub mouse_capture: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            mouse_capture: true,
        }
    }
}

/// RAII guard for raw mode and friends.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen_enabled: bool,
    mouse_enabled: bool,
}

impl TerminalSession {
    /// Enter raw mode and enable the requested features.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled or a feature toggle
    /// cannot be written. Anything already enabled is restored first.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        terminal::enable_raw_mode()?;
        tracing::debug!(target: "limbo.tty", "raw mode enabled");

        let mut session = Self {
            alternate_screen_enabled: false,
            mouse_enabled: false,
        };
        let mut stdout = io::stdout();

        if options.alternate_screen {
            execute!(
                stdout,
                terminal::EnterAlternateScreen,
                terminal::Clear(terminal::ClearType::All),
                cursor::MoveTo(0, 0)
            )?;
            session.alternate_screen_enabled = true;
            tracing::debug!(target: "limbo.tty", "alternate screen enabled");
        }

        if options.mouse_capture {
            execute!(stdout, event::EnableMouseCapture)?;
            session.mouse_enabled = true;
            tracing::debug!(target: "limbo.tty", "mouse capture enabled");
        }

        execute!(stdout, cursor::Hide)?;
        Ok(session)
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
            self.mouse_enabled = false;
        }

        let _ = execute!(stdout, cursor::Show);

        if self.alternate_screen_enabled {
            let _ = execute!(stdout, terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }

        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
        tracing::debug!(target: "limbo.tty", "terminal restored");
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

/// Restore the terminal on paths that skip `Drop`.
pub fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, event::DisableMouseCapture);
    let _ = execute!(stdout, cursor::Show);
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}
