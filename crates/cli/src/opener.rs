//! Opens the generated deck with the desktop's default application.

use std::path::Path;
use std::process::Command;

/// Command that opens `path` on the current platform.
fn open_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.arg("/C").arg("start").arg("").arg(path);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// Try to open `path`. Failures are logged, never returned.
pub fn open_file(path: &Path) {
    match open_command(path).spawn() {
        Ok(_) => log::debug!("Opened {}", path.display()),
        Err(e) => log::warn!("Could not open {}: {}", path.display(), e),
    }
}
