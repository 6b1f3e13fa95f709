//! Target binary validation
//!
//! Parses the target with goblin and checks it is something LD_PRELOAD can
//! reach: a dynamically linked x86_64 ELF executable.

use std::fs;
use std::path::Path;

use goblin::elf::header::{ELFMAG, EM_X86_64, ET_DYN, ET_EXEC, SELFMAG};
use goblin::elf::Elf;

use spy::error::LaunchError;

/// What we learned about a valid target
#[derive(Debug, Clone)]
pub struct TargetInfo {
    /// Program interpreter (dynamic loader) requested by the target
    pub interpreter: String,
    /// DT_NEEDED entries
    pub libraries: Vec<String>,
}

impl TargetInfo {
    /// Whether the target links WebKitGTK directly
    pub fn links_webkit(&self) -> bool {
        self.libraries
            .iter()
            .any(|lib| lib.starts_with("libwebkit2gtk") || lib.starts_with("libwebkitgtk"))
    }
}

/// Check the file on disk, then its ELF header
pub fn validate_target(path: &Path) -> Result<TargetInfo, LaunchError> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(LaunchError::TargetNotFound(display));
    }
    if !path.is_file() {
        return Err(LaunchError::NotAFile(display));
    }
    if !is_executable(path) {
        return Err(LaunchError::NotExecutable(display));
    }

    let bytes = fs::read(path).map_err(|source| LaunchError::Io {
        path: display.clone(),
        source,
    })?;
    inspect_elf(&bytes, &display)
}

#[cfg(target_os = "linux")]
fn is_executable(path: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};

    access(path, AccessFlags::X_OK).is_ok()
}

#[cfg(not(target_os = "linux"))]
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        let _ = path;
        true
    }
}

/// Validate an in-memory ELF image
pub fn inspect_elf(bytes: &[u8], display: &str) -> Result<TargetInfo, LaunchError> {
    if bytes.len() < 64 || &bytes[..SELFMAG] != ELFMAG {
        return Err(LaunchError::NotElf(display.to_string()));
    }

    let elf = Elf::parse(bytes).map_err(|e| {
        log::debug!("goblin rejected {}: {}", display, e);
        LaunchError::NotElf(display.to_string())
    })?;

    if !elf.is_64 {
        return Err(LaunchError::Not64Bit);
    }
    if elf.header.e_machine != EM_X86_64 {
        return Err(LaunchError::UnsupportedArch {
            machine: elf.header.e_machine,
        });
    }
    if elf.header.e_type != ET_EXEC && elf.header.e_type != ET_DYN {
        return Err(LaunchError::NotExecutableElf {
            e_type: elf.header.e_type,
        });
    }
    let interpreter = elf.interpreter.ok_or(LaunchError::StaticallyLinked)?;

    Ok(TargetInfo {
        interpreter: interpreter.to_string(),
        libraries: elf.libraries.iter().map(|lib| lib.to_string()).collect(),
    })
}
