//! Error types for the preload object and the launcher.
//!
//! Nothing here ever crosses the FFI boundary: the exported entry points
//! absorb every `SpyError` and report it through the log.

use thiserror::Error;

/// Failures inside the injected library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpyError {
    #[error("Could not find real {name}()")]
    UnresolvedSymbol { name: &'static str },

    #[error("Host runtime symbol unavailable: {symbol}")]
    HostUnavailable { symbol: &'static str },

    #[error("Host returned a null {what}")]
    NullObject { what: &'static str },

    #[error("Host refused to connect the {signal} handler")]
    SignalRejected { signal: &'static str },
}

/// Failures while validating or launching a target
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Target binary not found: {0}")]
    TargetNotFound(String),

    #[error("Target is not a file: {0}")]
    NotAFile(String),

    #[error("Target is not executable: {0}")]
    NotExecutable(String),

    #[error("Target is not an ELF binary: {0}")]
    NotElf(String),

    #[error("Target is a 32-bit binary, x86_64 is required")]
    Not64Bit,

    #[error("Target architecture is not x86_64 (e_machine={machine:#X})")]
    UnsupportedArch { machine: u16 },

    #[error("Target is not an executable ELF (type={e_type})")]
    NotExecutableElf { e_type: u16 },

    #[error("Target is statically linked, LD_PRELOAD has no effect on it")]
    StaticallyLinked,

    #[error("Could not find libspy.so, is it built?")]
    LibraryNotFound,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    /// Short remediation hint printed under the error, if there is one
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            LaunchError::NotElf(_) => Some("tauri-spy only works with Linux ELF executables"),
            LaunchError::Not64Bit => Some("Rebuild the target for x86_64"),
            LaunchError::UnsupportedArch { .. } => Some("tauri-spy currently only supports x86_64"),
            LaunchError::NotExecutableElf { .. } => {
                Some("Expected a dynamically linked executable")
            }
            LaunchError::StaticallyLinked => Some("Expected a dynamically linked executable"),
            LaunchError::LibraryNotFound => Some("Build the library with: cargo build --release"),
            _ => None,
        }
    }
}
