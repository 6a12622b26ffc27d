//! Handing targets to the operating system's default handler.

use std::process::{Command, Stdio};
use tracing::{debug, error};

/// Something that opens a URL or path (allows mocking in tests).
///
/// Opening is fire-and-forget: failures are logged by the implementation
/// and never reported back.
pub trait Opener {
    fn open(&self, target: &str);
}

/// Launches the platform opener (`xdg-open`, `open` or `explorer.exe`).
#[derive(Debug, Clone)]
pub struct SystemOpener {
    program: Option<String>,
}

impl SystemOpener {
    pub fn new() -> Self {
        Self {
            program: default_program().map(str::to_string),
        }
    }

    /// Uses `program` instead of the platform default.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }
}

impl Default for SystemOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl Opener for SystemOpener {
    fn open(&self, target: &str) {
        let Some(program) = &self.program else {
            error!(os = std::env::consts::OS, "no opener known for this platform");
            return;
        };

        match Command::new(program)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => debug!(program = program.as_str(), target, pid = child.id(), "opened"),
            Err(e) => error!(program = program.as_str(), target, error = %e, "failed to launch opener"),
        }
    }
}

fn default_program() -> Option<&'static str> {
    if cfg!(target_os = "windows") {
        Some("explorer.exe")
    } else if cfg!(target_os = "macos") {
        Some("open")
    } else if cfg!(unix) {
        Some("xdg-open")
    } else {
        None
    }
}
