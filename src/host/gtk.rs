//! GTK 3 / WebKit2GTK implementation of [`HostRuntime`].
//!
//! The toolkit is already loaded in the target process, so every function is
//! resolved with `dlsym(RTLD_DEFAULT, ..)` instead of being linked. The table
//! is cached only once it resolves completely; before WebKit is loaded each
//! idle tick simply tries again.

use std::cell::OnceCell;
use std::ffi::{c_void, CStr};
use std::mem;
use std::ptr;
use std::sync::OnceLock;

use super::ffi::{
    ContainerGetChildrenFn, GCallback, GList, GType, IdleAddFn, InspectorActionFn,
    InspectorIsAttachedFn, KeyPressHandler, ListFreeFn, ListToplevelsFn, SetDeveloperExtrasFn,
    SignalConnectDataFn, TypeCheckInstanceIsAFn, TypeFromNameFn, WebViewGetFn, GFALSE, GTRUE,
};
use super::{HostRuntime, ObjectId};
use crate::error::SpyError;
use crate::intercept::{exports, EntryPoint, Interceptor};

const WEB_VIEW_TYPE: &CStr = c"WebKitWebView";
const CONTAINER_TYPE: &CStr = c"GtkContainer";
const KEY_PRESS_SIGNAL: &CStr = c"key-press-event";

/// Resolve `symbol` from any object already loaded into the process
unsafe fn lookup<F: Copy>(symbol: &'static CStr) -> Result<F, SpyError> {
    debug_assert_eq!(mem::size_of::<F>(), mem::size_of::<*mut c_void>());

    let addr = libc::dlsym(libc::RTLD_DEFAULT, symbol.as_ptr());
    if addr.is_null() {
        return Err(SpyError::HostUnavailable {
            symbol: symbol.to_str().unwrap_or("<non-utf8>"),
        });
    }
    Ok(mem::transmute_copy::<*mut c_void, F>(&addr))
}

/// Resolved GLib/GTK/WebKit functions
pub struct GtkApi {
    type_from_name: TypeFromNameFn,
    type_check_instance_is_a: TypeCheckInstanceIsAFn,
    list_toplevels: ListToplevelsFn,
    container_get_children: ContainerGetChildrenFn,
    list_free: ListFreeFn,
    web_view_get_settings: WebViewGetFn,
    web_view_get_inspector: WebViewGetFn,
    inspector_show: InspectorActionFn,
    inspector_close: InspectorActionFn,
    inspector_is_attached: InspectorIsAttachedFn,
    signal_connect_data: SignalConnectDataFn,
}

static API: OnceLock<GtkApi> = OnceLock::new();

impl GtkApi {
    unsafe fn load() -> Result<Self, SpyError> {
        Ok(Self {
            type_from_name: lookup(c"g_type_from_name")?,
            type_check_instance_is_a: lookup(c"g_type_check_instance_is_a")?,
            list_toplevels: lookup(c"gtk_window_list_toplevels")?,
            container_get_children: lookup(c"gtk_container_get_children")?,
            list_free: lookup(c"g_list_free")?,
            web_view_get_settings: lookup(c"webkit_web_view_get_settings")?,
            web_view_get_inspector: lookup(c"webkit_web_view_get_inspector")?,
            inspector_show: lookup(c"webkit_web_inspector_show")?,
            inspector_close: lookup(c"webkit_web_inspector_close")?,
            inspector_is_attached: lookup(c"webkit_web_inspector_is_attached")?,
            signal_connect_data: lookup(c"g_signal_connect_data")?,
        })
    }

    /// The process-wide table, loading it if every symbol is available now
    pub fn get() -> Result<&'static GtkApi, SpyError> {
        if let Some(api) = API.get() {
            return Ok(api);
        }
        let api = unsafe { Self::load() }?;
        Ok(API.get_or_init(|| api))
    }

    fn type_named(&self, name: &CStr) -> GType {
        unsafe { (self.type_from_name)(name.as_ptr()) }
    }

    fn is_a(&self, object: ObjectId, type_name: &CStr) -> bool {
        let gtype = self.type_named(type_name);
        gtype != 0 && unsafe { (self.type_check_instance_is_a)(object.as_ptr(), gtype) } != GFALSE
    }

    /// Copy a container-owned GList of objects and free the list itself
    unsafe fn drain(&self, list: *mut GList) -> Vec<ObjectId> {
        let mut objects = Vec::new();
        let mut node = list;
        while !node.is_null() {
            if let Some(object) = ObjectId::from_ptr((*node).data) {
                objects.push(object);
            }
            node = (*node).next;
        }
        if !list.is_null() {
            (self.list_free)(list);
        }
        objects
    }
}

/// [`HostRuntime`] over the live GTK object graph
pub struct GtkHost<'a> {
    /// Resolved on first use; loop entry points only need `g_idle_add`
    api: OnceCell<Result<&'static GtkApi, SpyError>>,
    interceptor: Interceptor<'a>,
}

impl<'a> GtkHost<'a> {
    /// The interceptor supplies the original WebKit setter, resolved on first use.
    pub fn new(interceptor: Interceptor<'a>) -> Self {
        Self {
            api: OnceCell::new(),
            interceptor,
        }
    }

    fn api(&self) -> Result<&'static GtkApi, SpyError> {
        self.api.get_or_init(GtkApi::get).clone()
    }

    fn inspector(&self, view: ObjectId) -> Result<*mut c_void, SpyError> {
        let api = self.api()?;
        let inspector = unsafe { (api.web_view_get_inspector)(view.as_ptr()) };
        if inspector.is_null() {
            return Err(SpyError::NullObject { what: "inspector" });
        }
        Ok(inspector)
    }
}

impl HostRuntime for GtkHost<'_> {
    fn web_view_type_registered(&self) -> bool {
        match self.api() {
            Ok(api) => api.type_named(WEB_VIEW_TYPE) != 0,
            Err(e) => {
                log::trace!("Toolkit not ready: {}", e);
                false
            }
        }
    }

    fn toplevel_windows(&self) -> Vec<ObjectId> {
        match self.api() {
            Ok(api) => unsafe { api.drain((api.list_toplevels)()) },
            Err(_) => Vec::new(),
        }
    }

    fn children(&self, container: ObjectId) -> Vec<ObjectId> {
        match self.api() {
            Ok(api) => unsafe { api.drain((api.container_get_children)(container.as_ptr())) },
            Err(_) => Vec::new(),
        }
    }

    fn is_container(&self, object: ObjectId) -> bool {
        self.api().is_ok_and(|api| api.is_a(object, CONTAINER_TYPE))
    }

    fn is_web_view(&self, object: ObjectId) -> bool {
        self.api().is_ok_and(|api| api.is_a(object, WEB_VIEW_TYPE))
    }

    fn enable_developer_extras(&self, view: ObjectId) -> Result<(), SpyError> {
        let api = self.api()?;
        let set: SetDeveloperExtrasFn = self
            .interceptor
            .original_set_developer_extras()
            .ok_or(SpyError::UnresolvedSymbol {
                name: EntryPoint::SetDeveloperExtras.name(),
            })?;

        let settings = unsafe { (api.web_view_get_settings)(view.as_ptr()) };
        if settings.is_null() {
            return Err(SpyError::NullObject { what: "settings" });
        }
        unsafe { set(settings, GTRUE) };
        Ok(())
    }

    fn show_inspector(&self, view: ObjectId) -> Result<(), SpyError> {
        let inspector = self.inspector(view)?;
        unsafe { (self.api()?.inspector_show)(inspector) };
        Ok(())
    }

    fn close_inspector(&self, view: ObjectId) -> Result<(), SpyError> {
        let inspector = self.inspector(view)?;
        unsafe { (self.api()?.inspector_close)(inspector) };
        Ok(())
    }

    fn inspector_attached(&self, view: ObjectId) -> Result<bool, SpyError> {
        let inspector = self.inspector(view)?;
        Ok(unsafe { (self.api()?.inspector_is_attached)(inspector) } != GFALSE)
    }

    fn schedule_discovery(&self) -> Result<(), SpyError> {
        // GLib is always present by the time a main loop entry point runs,
        // even when WebKit is not loaded yet.
        let idle_add: IdleAddFn = unsafe { lookup(c"g_idle_add")? };
        unsafe { idle_add(exports::discovery_idle, ptr::null_mut()) };
        Ok(())
    }

    fn connect_key_press(&self, window: ObjectId) -> Result<(), SpyError> {
        let api = self.api()?;
        let handler = unsafe {
            mem::transmute::<KeyPressHandler, GCallback>(exports::on_key_press)
        };

        let id = unsafe {
            (api.signal_connect_data)(
                window.as_ptr(),
                KEY_PRESS_SIGNAL.as_ptr(),
                handler,
                ptr::null_mut(),
                None,
                0,
            )
        };
        if id == 0 {
            return Err(SpyError::SignalRejected {
                signal: "key-press-event",
            });
        }
        Ok(())
    }
}
