//! Discovery module - finding web views in a live widget tree.
//!
//! The host offers no "web view created" notification, and the WebKit type
//! may not even be registered when the main loop starts. Discovery therefore
//! runs as an idle task that keeps asking to be re-invoked until it finds at
//! least one web view or runs out of attempts.

pub mod walker;


use crate::config::MAX_RETRIES;
use crate::host::ffi::{gboolean, G_SOURCE_CONTINUE, G_SOURCE_REMOVE};
use crate::host::HostRuntime;
use crate::inspector::{Activator, ShortcutHandler};

/// Final result of discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    /// Gave up at the retry ceiling; carries what the last attempt was missing
    Failed(Pending),
}

/// Discovery lifecycle; never goes back once complete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiscoveryState {
    #[default]
    NotStarted,
    InProgress,
    Complete(Outcome),
}

/// What the idle scheduler should do with the task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleAction {
    Retry,
    Done,
}

impl IdleAction {
    pub fn as_gboolean(self) -> gboolean {
        match self {
            IdleAction::Retry => G_SOURCE_CONTINUE,
            IdleAction::Done => G_SOURCE_REMOVE,
        }
    }
}

/// Why an attempt came up empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    TypeNotRegistered,
    NoWindows,
    NoWebViews,
}

impl Pending {
    fn give_up_message(self) -> &'static str {
        match self {
            Pending::TypeNotRegistered => {
                "WebKitWebView type never registered (not a Tauri/WebKit app?)"
            }
            Pending::NoWindows => "No top-level windows found",
            Pending::NoWebViews => "No WebKitWebView found in widget tree",
        }
    }
}

/// State machine behind the idle task
#[derive(Debug)]
pub struct Discovery {
    state: DiscoveryState,
    retries: u32,
    max_retries: u32,
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new()
    }
}

impl Discovery {
    pub fn new() -> Self {
        Self::with_max_retries(MAX_RETRIES)
    }

    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            state: DiscoveryState::NotStarted,
            retries: 0,
            max_retries,
        }
    }

    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, DiscoveryState::Complete(_))
    }

    /// Run one attempt: scan every top-level window, activate what is found
    /// and, on success, connect the shortcut to each window.
    pub fn step(
        &mut self,
        host: &dyn HostRuntime,
        activator: &mut Activator,
        shortcuts: &mut ShortcutHandler,
    ) -> IdleAction {
        match self.state {
            DiscoveryState::Complete(_) => return IdleAction::Done,
            DiscoveryState::NotStarted => self.state = DiscoveryState::InProgress,
            DiscoveryState::InProgress => {}
        }

        if !host.web_view_type_registered() {
            return self.defer(Pending::TypeNotRegistered);
        }

        let windows = host.toplevel_windows();
        if windows.is_empty() {
            return self.defer(Pending::NoWindows);
        }

        // Any visited web view counts, newly tracked or not
        let mut found = 0;
        for &window in &windows {
            if host.is_container(window) {
                found += walker::walk(host, window, &mut |view| {
                    activator.activate(host, view);
                });
            }
        }
        if found == 0 {
            return self.defer(Pending::NoWebViews);
        }

        for &window in &windows {
            shortcuts.install(host, window);
        }

        self.state = DiscoveryState::Complete(Outcome::Succeeded);
        log::info!("Injection complete, Ctrl+Shift+I to toggle inspector");
        IdleAction::Done
    }

    fn defer(&mut self, reason: Pending) -> IdleAction {
        self.retries += 1;
        if self.retries >= self.max_retries {
            log::warn!("{}", reason.give_up_message());
            self.state = DiscoveryState::Complete(Outcome::Failed(reason));
            return IdleAction::Done;
        }
        log::trace!("Discovery attempt {} deferred: {:?}", self.retries, reason);
        IdleAction::Retry
    }
}
