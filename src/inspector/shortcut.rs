//! Ctrl+Shift+I handling.
//!
//! One key-press listener per top-level window; the chord toggles the
//! inspector of every registered web view.

use std::collections::HashSet;
use std::ffi::c_uint;

use super::registry::WebViewRegistry;
use crate::host::ffi::{
    gboolean, GDK_CONTROL_MASK, GDK_KEY_I, GDK_KEY_i, GDK_MOD1_MASK, GDK_SHIFT_MASK,
    GDK_SUPER_MASK, GFALSE, GTRUE,
};
use crate::host::{HostRuntime, ObjectId};

/// Modifier keys held during a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub fn from_gdk_state(state: c_uint) -> Self {
        Self {
            ctrl: state & GDK_CONTROL_MASK != 0,
            shift: state & GDK_SHIFT_MASK != 0,
            alt: state & GDK_MOD1_MASK != 0,
            super_key: state & GDK_SUPER_MASK != 0,
        }
    }
}

/// A key-press event as delivered to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub modifiers: Modifiers,
    pub keyval: c_uint,
}

impl KeyPress {
    pub fn from_gdk(state: c_uint, keyval: c_uint) -> Self {
        Self {
            modifiers: Modifiers::from_gdk_state(state),
            keyval,
        }
    }

    /// Ctrl and Shift held (others allowed) with `I` or `i`
    pub fn is_inspector_toggle(&self) -> bool {
        self.modifiers.ctrl
            && self.modifiers.shift
            && (self.keyval == GDK_KEY_I || self.keyval == GDK_KEY_i)
    }
}

/// Whether the host should keep dispatching the event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    Proceed,
}

impl Propagation {
    pub fn as_gboolean(self) -> gboolean {
        match self {
            Propagation::Stop => GTRUE,
            Propagation::Proceed => GFALSE,
        }
    }
}

/// Tracks which windows already carry the shortcut listener
#[derive(Debug, Default)]
pub struct ShortcutHandler {
    windows: HashSet<ObjectId>,
}

impl ShortcutHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect the listener to `window` unless it already has one.
    ///
    /// Returns true when a listener was connected by this call.
    pub fn install(&mut self, host: &dyn HostRuntime, window: ObjectId) -> bool {
        if self.windows.contains(&window) {
            return false;
        }
        match host.connect_key_press(window) {
            Ok(()) => {
                log::debug!("Shortcut handler connected to window {}", window);
                self.windows.insert(window);
                true
            }
            Err(e) => {
                log::warn!("Could not connect shortcut to window {}: {}", window, e);
                false
            }
        }
    }

    pub fn is_installed(&self, window: ObjectId) -> bool {
        self.windows.contains(&window)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn handle_key_press(
        &self,
        host: &dyn HostRuntime,
        registry: &WebViewRegistry,
        key: KeyPress,
    ) -> Propagation {
        if !key.is_inspector_toggle() {
            return Propagation::Proceed;
        }

        log::info!("Ctrl+Shift+I pressed, toggling inspector");
        toggle_inspectors(host, registry);
        Propagation::Stop
    }
}

/// Close every attached inspector and show every detached one
pub fn toggle_inspectors(host: &dyn HostRuntime, registry: &WebViewRegistry) {
    for view in registry.iter() {
        let result = match host.inspector_attached(view) {
            Ok(true) => host.close_inspector(view),
            Ok(false) => host.show_inspector(view),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            log::debug!("Skipping inspector toggle on {}: {}", view, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::{FakeHost, Kind};

    const CTRL_SHIFT: c_uint = GDK_CONTROL_MASK | GDK_SHIFT_MASK;

    #[test]
    fn test_chord_matching() {
        assert!(KeyPress::from_gdk(CTRL_SHIFT, GDK_KEY_I).is_inspector_toggle());
        assert!(KeyPress::from_gdk(CTRL_SHIFT, GDK_KEY_i).is_inspector_toggle());
        assert!(KeyPress::from_gdk(CTRL_SHIFT | GDK_MOD1_MASK, GDK_KEY_I).is_inspector_toggle());

        assert!(!KeyPress::from_gdk(GDK_CONTROL_MASK, GDK_KEY_I).is_inspector_toggle());
        assert!(!KeyPress::from_gdk(GDK_SHIFT_MASK, GDK_KEY_I).is_inspector_toggle());
        assert!(!KeyPress::from_gdk(0, GDK_KEY_i).is_inspector_toggle());
        assert!(!KeyPress::from_gdk(CTRL_SHIFT, 0x04a).is_inspector_toggle()); // J
    }

    #[test]
    fn test_toggle_flips_each_view() {
        let host = FakeHost::ready();
        let window = host.window();
        let open = host.add(window, Kind::WebView);
        let closed = host.add(window, Kind::WebView);
        host.open_inspectors.borrow_mut().insert(open);

        let mut registry = WebViewRegistry::new();
        registry.track(open);
        registry.track(closed);

        let handler = ShortcutHandler::new();
        let result = handler.handle_key_press(&host, &registry, KeyPress::from_gdk(CTRL_SHIFT, GDK_KEY_I));

        assert_eq!(result, Propagation::Stop);
        assert!(!host.is_open(open));
        assert!(host.is_open(closed));
    }

    #[test]
    fn test_other_keys_pass_through_untouched() {
        let host = FakeHost::ready();
        let window = host.window();
        let view = host.add(window, Kind::WebView);

        let mut registry = WebViewRegistry::new();
        registry.track(view);

        let handler = ShortcutHandler::new();
        for key in [
            KeyPress::from_gdk(GDK_CONTROL_MASK, GDK_KEY_I),
            KeyPress::from_gdk(CTRL_SHIFT, 0x061), // a
            KeyPress::from_gdk(0, GDK_KEY_I),
        ] {
            assert_eq!(handler.handle_key_press(&host, &registry, key), Propagation::Proceed);
        }
        assert!(!host.is_open(view));
        assert_eq!(host.show_calls.get(), 0);
    }

    #[test]
    fn test_install_once_per_window() {
        let host = FakeHost::ready();
        let window = host.window();

        let mut handler = ShortcutHandler::new();
        assert!(handler.install(&host, window));
        assert!(!handler.install(&host, window));
        assert!(handler.is_installed(window));
        assert_eq!(host.key_handlers.borrow().as_slice(), &[window]);
    }
}
