//! In-memory widget tree used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use super::{HostRuntime, ObjectId};
use crate::error::SpyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Window,
    Container,
    WebView,
    /// A web view subclass that also manages children
    WebViewContainer,
    Widget,
}

impl Kind {
    fn is_container(self) -> bool {
        matches!(self, Kind::Window | Kind::Container | Kind::WebViewContainer)
    }

    fn is_web_view(self) -> bool {
        matches!(self, Kind::WebView | Kind::WebViewContainer)
    }
}

struct Node {
    kind: Kind,
    children: Vec<ObjectId>,
}

#[derive(Default)]
pub struct FakeHost {
    type_registered: Cell<bool>,
    next_id: Cell<usize>,
    toplevels: RefCell<Vec<ObjectId>>,
    nodes: RefCell<HashMap<ObjectId, Node>>,
    /// Every developer-extras call, in order
    pub extras_enabled: RefCell<Vec<ObjectId>>,
    pub open_inspectors: RefCell<HashSet<ObjectId>>,
    pub show_calls: Cell<usize>,
    pub key_handlers: RefCell<Vec<ObjectId>>,
    pub scheduled: Cell<usize>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0x1000),
            ..Default::default()
        }
    }

    /// A host whose web view type is already registered
    pub fn ready() -> Self {
        let host = Self::new();
        host.set_type_registered(true);
        host
    }

    pub fn set_type_registered(&self, registered: bool) {
        self.type_registered.set(registered);
    }

    fn alloc(&self, kind: Kind) -> ObjectId {
        let id = ObjectId::from_raw(self.next_id.get());
        self.next_id.set(self.next_id.get() + 0x10);
        self.nodes.borrow_mut().insert(
            id,
            Node {
                kind,
                children: Vec::new(),
            },
        );
        id
    }

    pub fn window(&self) -> ObjectId {
        let id = self.alloc(Kind::Window);
        self.toplevels.borrow_mut().push(id);
        id
    }

    pub fn add(&self, parent: ObjectId, kind: Kind) -> ObjectId {
        let id = self.alloc(kind);
        self.nodes
            .borrow_mut()
            .get_mut(&parent)
            .expect("parent exists")
            .children
            .push(id);
        id
    }

    fn kind(&self, object: ObjectId) -> Option<Kind> {
        self.nodes.borrow().get(&object).map(|n| n.kind)
    }

    pub fn is_open(&self, view: ObjectId) -> bool {
        self.open_inspectors.borrow().contains(&view)
    }
}

impl HostRuntime for FakeHost {
    fn web_view_type_registered(&self) -> bool {
        self.type_registered.get()
    }

    fn toplevel_windows(&self) -> Vec<ObjectId> {
        self.toplevels.borrow().clone()
    }

    fn children(&self, container: ObjectId) -> Vec<ObjectId> {
        self.nodes
            .borrow()
            .get(&container)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn is_container(&self, object: ObjectId) -> bool {
        self.kind(object).is_some_and(Kind::is_container)
    }

    fn is_web_view(&self, object: ObjectId) -> bool {
        self.kind(object).is_some_and(Kind::is_web_view)
    }

    fn enable_developer_extras(&self, view: ObjectId) -> Result<(), SpyError> {
        self.extras_enabled.borrow_mut().push(view);
        Ok(())
    }

    fn show_inspector(&self, view: ObjectId) -> Result<(), SpyError> {
        self.show_calls.set(self.show_calls.get() + 1);
        self.open_inspectors.borrow_mut().insert(view);
        Ok(())
    }

    fn close_inspector(&self, view: ObjectId) -> Result<(), SpyError> {
        self.open_inspectors.borrow_mut().remove(&view);
        Ok(())
    }

    fn inspector_attached(&self, view: ObjectId) -> Result<bool, SpyError> {
        Ok(self.is_open(view))
    }

    fn schedule_discovery(&self) -> Result<(), SpyError> {
        self.scheduled.set(self.scheduled.get() + 1);
        Ok(())
    }

    fn connect_key_press(&self, window: ObjectId) -> Result<(), SpyError> {
        self.key_handlers.borrow_mut().push(window);
        Ok(())
    }
}
