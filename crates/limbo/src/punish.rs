#![forbid(unsafe_code)]

//! The punitive action: power the machine off after a short delay.
//!
//! Only builds with the `armed` feature run the command. Otherwise the
//! action logs it and keeps it so `main` can print it once the terminal is
//! restored.

use std::io;
use std::process::{Command, Stdio};
use std::time::Duration;

use limbo_backend::PunitiveAction;

/// OS command that shuts the machine down after `delay`.
pub fn shutdown_command(delay: Duration) -> Command {
    let secs = delay.as_secs().to_string();
    if cfg!(windows) {
        let mut cmd = Command::new("shutdown");
        cmd.args(["/s", "/t", secs.as_str()]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(format!("sleep {secs}; shutdown -h now"));
        cmd
    }
}

/// Render a command the way a shell user would type it.
pub fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| {
            let part = part.to_string_lossy();
            if part.contains(' ') {
                format!("\"{part}\"")
            } else {
                part.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shutdown via the OS `shutdown` command.
#[derive(Debug)]
pub struct SystemShutdown {
    armed: bool,
    intent: Option<String>,
}

impl SystemShutdown {
    /// Armed exactly when built with the `armed` feature.
    pub fn from_build() -> Self {
        if cfg!(feature = "armed") {
            Self {
                armed: true,
                intent: None,
            }
        } else {
            Self::dry_run()
        }
    }

    /// Never runs anything.
    pub fn dry_run() -> Self {
        Self {
            armed: false,
            intent: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// The command a dry run would have executed.
    pub fn intent(&self) -> Option<&str> {
        self.intent.as_deref()
    }
}

impl PunitiveAction for SystemShutdown {
    type Error = io::Error;

    fn invoke(&mut self, delay: Duration) -> Result<(), io::Error> {
        let mut cmd = shutdown_command(delay);
        let line = describe(&cmd);
        if !self.armed {
            tracing::warn!(target: "limbo.punish", command = %line, "dry run, not shutting down");
            self.intent = Some(line);
            return Ok(());
        }
        tracing::warn!(target: "limbo.punish", command = %line, "shutting down");
        // Detached: the child outlives this process.
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_carries_delay() {
        let line = describe(&shutdown_command(Duration::from_secs(3)));
        if cfg!(windows) {
            assert_eq!(line, "shutdown /s /t 3");
        } else {
            assert_eq!(line, "sh -c \"sleep 3; shutdown -h now\"");
        }
    }

    #[test]
    fn dry_run_records_intent_once_invoked() {
        let mut p = SystemShutdown::dry_run();
        assert!(!p.is_armed());
        assert_eq!(p.intent(), None);
        p.invoke(Duration::from_secs(3)).unwrap();
        assert!(p.intent().unwrap().contains('3'));
    }

    #[cfg(not(feature = "armed"))]
    #[test]
    fn default_build_is_disarmed() {
        assert!(!SystemShutdown::from_build().is_armed());
    }
}
