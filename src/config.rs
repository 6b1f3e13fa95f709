//! Process environment and fixed limits.

use std::env;

/// Environment toggle: `1` opens the inspector as soon as a web view is found
pub const AUTO_OPEN_VAR: &str = "TAURI_SPY_AUTO_OPEN";

/// Log filter for the injected library (env_logger syntax)
pub const LOG_VAR: &str = "TAURI_SPY_LOG";

/// Idle invocations the discovery task gets before it gives up
pub const MAX_RETRIES: u32 = 200;

/// Web views tracked for the keyboard shortcut
pub const MAX_WEBVIEWS: usize = 16;

/// Prefix on every diagnostic line written by the injected library
pub const LOG_PREFIX: &str = "[tauri-spy]";

/// Settings read from the target's environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpyConfig {
    /// Show the inspector immediately on discovery
    pub auto_open: bool,
}

impl SpyConfig {
    pub fn from_env() -> Self {
        Self::from_value(env::var(AUTO_OPEN_VAR).ok().as_deref())
    }

    /// Only the literal `1` enables auto-open.
    pub fn from_value(value: Option<&str>) -> Self {
        Self {
            auto_open: value == Some("1"),
        }
    }
}
