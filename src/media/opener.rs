use std::io;
use std::process::{Command, Stdio};

use tracing::debug;

/// Hands a URL or file path to whatever the desktop uses to open it.
pub trait LinkOpener {
    fn open(&self, target: &str) -> io::Result<()>;
}

pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, target: &str) -> io::Result<()> {
        let target = target.trim();
        if target.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty target"));
        }
        debug!(target, "opening with system handler");
        let mut command = opener_command(target);
        // The child's output would tear the alternate screen.
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}

#[cfg(target_os = "macos")]
fn opener_command(target: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(target);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(target: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", target]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(target: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(target);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_target_is_rejected() {
        let err = SystemOpener.open("   ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
