//! Exported C symbols and host callbacks.
//!
//! These shadow the real GTK/WebKit functions once the library is preloaded.
//! Every callback body runs under `catch_unwind`: a panic must never unwind
//! into C, and a failure here must never reach the target application.

use std::ffi::{c_char, c_int, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, TryLockError};

use super::{EntryPoint, Interceptor, NextResolver, SymbolCache};
use crate::config::SpyConfig;
use crate::context::SpyContext;
use crate::discovery::IdleAction;
use crate::host::ffi::{gboolean, GdkEventKey};
use crate::host::GtkHost;
use crate::inspector::{KeyPress, Propagation};
use crate::logging;

static SYMBOLS: SymbolCache = SymbolCache::new();
static RESOLVER: NextResolver = NextResolver;
static CONTEXT: OnceLock<Mutex<SpyContext>> = OnceLock::new();

/// Set once the idle task is registered; checked before any other work so
/// later loop turns cost a single atomic load.
static TASK_INSTALLED: AtomicBool = AtomicBool::new(false);

fn interceptor() -> Interceptor<'static> {
    logging::init();
    Interceptor::new(&SYMBOLS, &RESOLVER)
}

fn host() -> GtkHost<'static> {
    GtkHost::new(interceptor())
}

/// Lock the process context, or `None` if this thread already holds it.
fn context() -> Option<MutexGuard<'static, SpyContext>> {
    let context = CONTEXT.get_or_init(|| Mutex::new(SpyContext::new()));
    match context.try_lock() {
        Ok(guard) => Some(guard),
        Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => {
            log::debug!("Re-entrant callback ignored");
            None
        }
    }
}

/// Run `f`, turning a panic into `fallback`
fn guarded<T>(what: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            log::error!("Panic in {} suppressed", what);
            fallback
        }
    }
}

/// Run `install` until it reports success, then never again
fn install_once(flag: &AtomicBool, install: impl FnOnce() -> bool) {
    if flag.load(Ordering::Acquire) {
        return;
    }
    if install() {
        flag.store(true, Ordering::Release);
    }
}

fn install_discovery(entry: EntryPoint) {
    install_once(&TASK_INSTALLED, || {
        guarded("idle callback installation", false, || {
            let host = host();
            match context() {
                Some(mut ctx) => {
                    ctx.install_discovery(entry, SpyConfig::from_env, &host);
                    ctx.task_installed()
                }
                None => false,
            }
        })
    })
}

/// Idle task registered with `g_idle_add`
pub(crate) unsafe extern "C" fn discovery_idle(_data: *mut c_void) -> gboolean {
    guarded("discovery", IdleAction::Done, || {
        let host = host();
        match context() {
            Some(mut ctx) => ctx.run_discovery(&host),
            None => IdleAction::Retry,
        }
    })
    .as_gboolean()
}

/// `key-press-event` handler connected to each top-level window
pub(crate) unsafe extern "C" fn on_key_press(
    _widget: *mut c_void,
    event: *mut GdkEventKey,
    _data: *mut c_void,
) -> gboolean {
    if event.is_null() {
        return Propagation::Proceed.as_gboolean();
    }
    let key = KeyPress::from_gdk((*event).state, (*event).keyval);

    guarded("key-press handler", Propagation::Proceed, || {
        let host = host();
        match context() {
            Some(ctx) => ctx.handle_key_press(&host, key),
            None => Propagation::Proceed,
        }
    })
    .as_gboolean()
}

/// Hook: `gtk_main()`, the classic GTK event loop
#[no_mangle]
pub extern "C" fn gtk_main() {
    interceptor().gtk_main(install_discovery)
}

/// Hook: `g_application_run()`, the GtkApplication event loop
///
/// # Safety
/// Arguments are forwarded untouched to the real function.
#[no_mangle]
pub unsafe extern "C" fn g_application_run(
    application: *mut c_void,
    argc: c_int,
    argv: *mut *mut c_char,
) -> c_int {
    interceptor().application_run(application, argc, argv, install_discovery)
}

/// Hook: `gtk_main_iteration_do()`, called repeatedly by tao's event loop
#[no_mangle]
pub extern "C" fn gtk_main_iteration_do(blocking: gboolean) -> gboolean {
    interceptor().main_iteration_do(blocking, install_discovery)
}

/// Hook: `webkit_settings_set_enable_developer_extras()`, pinned to TRUE
///
/// # Safety
/// `settings` is forwarded untouched to the real function.
#[no_mangle]
pub unsafe extern "C" fn webkit_settings_set_enable_developer_extras(
    settings: *mut c_void,
    enabled: gboolean,
) {
    interceptor().set_developer_extras(settings, enabled)
}
