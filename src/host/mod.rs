//! Host module - the boundary to the running GTK/WebKit process.
//!
//! Everything the injected library needs from the target's toolkit goes
//! through [`HostRuntime`], so the discovery logic can run against the real
//! GTK object graph or an in-memory fake.

pub mod ffi;
pub mod gtk;

#[cfg(test)]
pub(crate) mod fake;

use std::fmt;

use crate::error::SpyError;

pub use gtk::GtkHost;

/// Opaque, non-owning handle to a host object (widget, window, web view).
///
/// The host owns every object; a handle never extends its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Wrap a host pointer, rejecting null
    pub fn from_ptr<T>(ptr: *mut T) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(Self(ptr as usize))
        }
    }

    pub fn as_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }

    pub fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Operations consumed from the host toolkit and web engine
pub trait HostRuntime {
    /// Whether the web view type has been registered with the type system yet
    fn web_view_type_registered(&self) -> bool;

    /// All top-level windows, in the host's order
    fn toplevel_windows(&self) -> Vec<ObjectId>;

    /// Direct children of a container; empty for leaves or on failure
    fn children(&self, container: ObjectId) -> Vec<ObjectId>;

    fn is_container(&self, object: ObjectId) -> bool;

    fn is_web_view(&self, object: ObjectId) -> bool;

    /// Set the developer-extras flag through the original, non-intercepted setter
    fn enable_developer_extras(&self, view: ObjectId) -> Result<(), SpyError>;

    fn show_inspector(&self, view: ObjectId) -> Result<(), SpyError>;

    fn close_inspector(&self, view: ObjectId) -> Result<(), SpyError>;

    fn inspector_attached(&self, view: ObjectId) -> Result<bool, SpyError>;

    /// Register the discovery task with the host's idle scheduler
    fn schedule_discovery(&self) -> Result<(), SpyError>;

    /// Connect the inspector shortcut listener to a window's key-press signal
    fn connect_key_press(&self, window: ObjectId) -> Result<(), SpyError>;
}
