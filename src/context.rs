//! Process-wide state shared by the interceptor, the discovery task and the
//! key-press listener.

use crate::config::SpyConfig;
use crate::discovery::{Discovery, IdleAction};
use crate::host::HostRuntime;
use crate::inspector::{Activator, KeyPress, Propagation, ShortcutHandler};
use crate::intercept::EntryPoint;

/// Everything the injected library remembers between callbacks.
///
/// Lives for the whole process; mutated only from the host's main thread.
#[derive(Debug, Default)]
pub struct SpyContext {
    discovery: Discovery,
    activator: Activator,
    shortcuts: ShortcutHandler,
    task_installed: bool,
}

impl SpyContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the discovery task the first time any loop entry point runs.
    ///
    /// `config` is only evaluated on that first call. Returns true when this
    /// call installed the task.
    pub fn install_discovery(
        &mut self,
        entry: EntryPoint,
        config: impl FnOnce() -> SpyConfig,
        host: &dyn HostRuntime,
    ) -> bool {
        debug_assert!(entry.enters_main_loop());
        if self.task_installed {
            return false;
        }
        self.task_installed = true;
        self.activator.set_auto_open(config().auto_open);

        log::info!("Hooked {}(), installing idle callback", entry.name());
        if let Err(e) = host.schedule_discovery() {
            log::error!("Could not install idle callback: {}", e);
        }
        true
    }

    /// One idle-slot invocation of the discovery task
    pub fn run_discovery(&mut self, host: &dyn HostRuntime) -> IdleAction {
        self.discovery
            .step(host, &mut self.activator, &mut self.shortcuts)
    }

    pub fn handle_key_press(&self, host: &dyn HostRuntime, key: KeyPress) -> Propagation {
        self.shortcuts
            .handle_key_press(host, self.activator.registry(), key)
    }

    pub fn task_installed(&self) -> bool {
        self.task_installed
    }

    pub fn discovery(&self) -> &Discovery {
        &self.discovery
    }

    pub fn activator(&self) -> &Activator {
        &self.activator
    }

    pub fn shortcuts(&self) -> &ShortcutHandler {
        &self.shortcuts
    }
}
