//! Inspector module - turning the web inspector on for discovered web views.
//!
//! Provides:
//! - Developer-extras activation and optional auto-open ([`Activator`])
//! - The bounded web view registry
//! - The Ctrl+Shift+I toggle handler, installed once per window

pub mod registry;
pub mod shortcut;

pub use registry::{Tracked, WebViewRegistry};
pub use shortcut::{KeyPress, Modifiers, Propagation, ShortcutHandler};

use crate::host::{HostRuntime, ObjectId};

/// Enables developer extras on web views and remembers them for the shortcut
#[derive(Debug, Default)]
pub struct Activator {
    registry: WebViewRegistry,
    auto_open: bool,
}

impl Activator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_auto_open(&mut self, auto_open: bool) {
        self.auto_open = auto_open;
    }

    pub fn auto_open(&self) -> bool {
        self.auto_open
    }

    pub fn registry(&self) -> &WebViewRegistry {
        &self.registry
    }

    /// Activate the inspector on `view`.
    ///
    /// Re-activating a known view only re-asserts the flag.
    pub fn activate(&mut self, host: &dyn HostRuntime, view: ObjectId) -> Tracked {
        match host.enable_developer_extras(view) {
            Ok(()) => log::info!("DevTools enabled on WebKitWebView {}", view),
            Err(e) => log::warn!("Could not enable DevTools on WebKitWebView {}: {}", view, e),
        }

        let tracked = self.registry.track(view);
        match tracked {
            Tracked::AlreadyTracked => return tracked,
            Tracked::Full => log::debug!(
                "Registry full ({} views), {} is not toggled by the shortcut",
                self.registry.capacity(),
                view
            ),
            Tracked::Added => {}
        }

        if self.auto_open {
            match host.show_inspector(view) {
                Ok(()) => log::info!("Inspector auto-opened"),
                Err(e) => log::warn!("Could not open inspector on {}: {}", view, e),
            }
        }
        tracked
    }
}
