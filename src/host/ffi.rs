//! FFI types for GLib, GTK 3 and WebKit2GTK
//!
//! Only the handful of layouts and signatures the injected library touches.
//! Nothing is linked at build time: every function is looked up with dlsym.

#![allow(non_camel_case_types, non_upper_case_globals)]

use std::ffi::{c_char, c_int, c_uint, c_ulong, c_void};

pub type gboolean = c_int;
pub type GType = usize;

pub const GFALSE: gboolean = 0;
pub const GTRUE: gboolean = 1;

/// `G_SOURCE_CONTINUE` / `G_SOURCE_REMOVE`
pub const G_SOURCE_CONTINUE: gboolean = GTRUE;
pub const G_SOURCE_REMOVE: gboolean = GFALSE;

/// GdkModifierType bits
pub const GDK_SHIFT_MASK: c_uint = 1 << 0;
pub const GDK_CONTROL_MASK: c_uint = 1 << 2;
pub const GDK_MOD1_MASK: c_uint = 1 << 3;
pub const GDK_SUPER_MASK: c_uint = 1 << 26;

pub const GDK_KEY_I: c_uint = 0x049;
pub const GDK_KEY_i: c_uint = 0x069;

#[repr(C)]
pub struct GList {
    pub data: *mut c_void,
    pub next: *mut GList,
    pub prev: *mut GList,
}

/// Leading fields of GdkEventKey (GTK 3)
#[repr(C)]
pub struct GdkEventKey {
    pub type_: c_int,
    pub window: *mut c_void,
    pub send_event: i8,
    pub time: u32,
    pub state: c_uint,
    pub keyval: c_uint,
    pub length: c_int,
    pub string: *mut c_char,
    pub hardware_keycode: u16,
    pub group: u8,
    pub is_modifier: c_uint,
}

// Intercepted entry points
pub type GtkMainFn = unsafe extern "C" fn();
pub type ApplicationRunFn =
    unsafe extern "C" fn(application: *mut c_void, argc: c_int, argv: *mut *mut c_char) -> c_int;
pub type MainIterationDoFn = unsafe extern "C" fn(blocking: gboolean) -> gboolean;
pub type SetDeveloperExtrasFn = unsafe extern "C" fn(settings: *mut c_void, enabled: gboolean);

// Callbacks handed to the host
pub type GSourceFunc = unsafe extern "C" fn(data: *mut c_void) -> gboolean;
pub type GCallback = unsafe extern "C" fn();
pub type GClosureNotify = Option<unsafe extern "C" fn(data: *mut c_void, closure: *mut c_void)>;
pub type KeyPressHandler = unsafe extern "C" fn(
    widget: *mut c_void,
    event: *mut GdkEventKey,
    data: *mut c_void,
) -> gboolean;

// Consumed host operations
pub type TypeFromNameFn = unsafe extern "C" fn(name: *const c_char) -> GType;
pub type TypeCheckInstanceIsAFn = unsafe extern "C" fn(instance: *mut c_void, iface: GType) -> gboolean;
pub type ListToplevelsFn = unsafe extern "C" fn() -> *mut GList;
pub type ContainerGetChildrenFn = unsafe extern "C" fn(container: *mut c_void) -> *mut GList;
pub type ListFreeFn = unsafe extern "C" fn(list: *mut GList);
pub type WebViewGetFn = unsafe extern "C" fn(view: *mut c_void) -> *mut c_void;
pub type InspectorActionFn = unsafe extern "C" fn(inspector: *mut c_void);
pub type InspectorIsAttachedFn = unsafe extern "C" fn(inspector: *mut c_void) -> gboolean;
pub type IdleAddFn = unsafe extern "C" fn(function: GSourceFunc, data: *mut c_void) -> c_uint;
pub type SignalConnectDataFn = unsafe extern "C" fn(
    instance: *mut c_void,
    detailed_signal: *const c_char,
    handler: GCallback,
    data: *mut c_void,
    destroy_data: GClosureNotify,
    connect_flags: c_uint,
) -> c_ulong;
