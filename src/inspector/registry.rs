//! Bounded, insertion-ordered set of discovered web views.

use crate::config::MAX_WEBVIEWS;
use crate::host::ObjectId;

/// Result of offering a web view to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracked {
    Added,
    AlreadyTracked,
    /// Capacity reached; the view works but the shortcut will not see it
    Full,
}

/// Web views the inspector shortcut toggles.
///
/// Holds non-owning handles; the host's widget tree owns the views.
#[derive(Debug, Clone)]
pub struct WebViewRegistry {
    views: Vec<ObjectId>,
    capacity: usize,
}

impl WebViewRegistry {
    pub fn new() -> Self {
        Self::with_capacity(MAX_WEBVIEWS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            views: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn track(&mut self, view: ObjectId) -> Tracked {
        if self.contains(view) {
            Tracked::AlreadyTracked
        } else if self.views.len() >= self.capacity {
            Tracked::Full
        } else {
            self.views.push(view);
            Tracked::Added
        }
    }

    pub fn contains(&self, view: ObjectId) -> bool {
        self.views.contains(&view)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.views.iter().copied()
    }
}

impl Default for WebViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}
