//! Launch module - starting a target with the inspector library preloaded.
//!
//! Provides:
//! - Target validation (ELF class, architecture, dynamic linking)
//! - Locating libspy.so relative to the launcher
//! - Building the child environment and running the target

pub mod target;

pub use target::validate_target;

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use spy::config::AUTO_OPEN_VAR;
use spy::error::LaunchError;

/// File name of the preload object produced by the `cdylib` target
pub const PRELOAD_LIBRARY: &str = "libspy.so";

/// WebKitGTK workarounds for blank/black windows under GPU compositing
const WEBKIT_ENV: [(&str, &str); 2] = [
    ("WEBKIT_DISABLE_COMPOSITING_MODE", "1"),
    ("WEBKIT_DISABLE_DMABUF_RENDERER", "1"),
];

/// Everything needed to start one target
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub target: PathBuf,
    pub args: Vec<String>,
    pub auto_open: bool,
}

/// Look for libspy.so next to the launcher, then in `../lib`
pub fn find_preload_library() -> Result<PathBuf, LaunchError> {
    let exe = env::current_exe().map_err(|source| LaunchError::Io {
        path: "<current executable>".into(),
        source,
    })?;
    let dir = exe.parent().ok_or(LaunchError::LibraryNotFound)?;
    find_preload_library_in(dir)
}

pub fn find_preload_library_in(dir: &Path) -> Result<PathBuf, LaunchError> {
    let candidate = dir.join(PRELOAD_LIBRARY);
    if candidate.exists() {
        return Ok(candidate);
    }

    // Installed layout: bin/tauri-spy + lib/libspy.so
    let candidate = dir.join("../lib").join(PRELOAD_LIBRARY);
    if candidate.exists() {
        return candidate.canonicalize().map_err(|source| LaunchError::Io {
            path: candidate.display().to_string(),
            source,
        });
    }

    Err(LaunchError::LibraryNotFound)
}

/// LD_PRELOAD value with our library first, keeping any existing preloads
pub fn preload_value(library: &Path, existing: Option<&str>) -> OsString {
    let mut preload = library.as_os_str().to_os_string();
    if let Some(existing) = existing.filter(|e| !e.is_empty()) {
        preload.push(":");
        preload.push(existing);
    }
    preload
}

/// Whether pkg-config knows about WebKitGTK 4.1
pub fn check_webkit_available() -> bool {
    Command::new("pkg-config")
        .args(["--exists", "webkit2gtk-4.1"])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Build the child command without running it
pub fn command(options: &LaunchOptions, library: &Path) -> Command {
    let existing = env::var("LD_PRELOAD").ok();
    let auto_open = if options.auto_open { "1" } else { "0" };

    let mut command = Command::new(&options.target);
    command
        .args(&options.args)
        .env("LD_PRELOAD", preload_value(library, existing.as_deref()))
        .env(AUTO_OPEN_VAR, auto_open)
        .envs(WEBKIT_ENV);
    command
}

/// Run the target to completion
pub fn launch(options: &LaunchOptions, library: &Path) -> Result<ExitStatus, LaunchError> {
    log::debug!("Launching {:?} with {:?}", options.target, options.args);
    command(options, library)
        .status()
        .map_err(|source| LaunchError::Io {
            path: options.target.display().to_string(),
            source,
        })
}

/// Exit code to mirror from the target; 1 when it was killed by a signal
pub fn exit_code(status: &ExitStatus) -> u8 {
    match status.code() {
        Some(code) => code as u8,
        None => {
            if let Some(signal) = termination_signal(status) {
                log::warn!("Target terminated by {}", signal);
            }
            1
        }
    }
}

#[cfg(target_os = "linux")]
fn termination_signal(status: &ExitStatus) -> Option<String> {
    use nix::sys::signal::Signal;
    use std::os::unix::process::ExitStatusExt;

    let raw = status.signal()?;
    Some(
        Signal::try_from(raw)
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|_| format!("signal {}", raw)),
    )
}

#[cfg(not(target_os = "linux"))]
fn termination_signal(_status: &ExitStatus) -> Option<String> {
    None
}
