//! Interceptor forwarding against fake originals

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ffi::{c_char, c_int, c_void, CStr};
use std::ptr;

use super::{EntryPoint, Interceptor, SymbolCache, SymbolResolver};
use crate::host::ffi::{gboolean, GFALSE, GTRUE};

thread_local! {
    static GTK_MAIN_CALLS: Cell<usize> = const { Cell::new(0) };
    static LAST_EXTRAS: Cell<Option<gboolean>> = const { Cell::new(None) };
    static LAST_BLOCKING: Cell<Option<gboolean>> = const { Cell::new(None) };
    static LAST_ARGC: Cell<Option<c_int>> = const { Cell::new(None) };
}

unsafe extern "C" fn fake_gtk_main() {
    GTK_MAIN_CALLS.with(|c| c.set(c.get() + 1));
}

unsafe extern "C" fn fake_application_run(
    _application: *mut c_void,
    argc: c_int,
    _argv: *mut *mut c_char,
) -> c_int {
    LAST_ARGC.with(|c| c.set(Some(argc)));
    42
}

unsafe extern "C" fn fake_main_iteration_do(blocking: gboolean) -> gboolean {
    LAST_BLOCKING.with(|c| c.set(Some(blocking)));
    GTRUE
}

unsafe extern "C" fn fake_set_developer_extras(_settings: *mut c_void, enabled: gboolean) {
    LAST_EXTRAS.with(|c| c.set(Some(enabled)));
}

/// Serves the fake originals above and counts lookups per symbol
#[derive(Default)]
struct FakeResolver {
    missing: Vec<EntryPoint>,
    lookups: RefCell<HashMap<String, usize>>,
}

impl FakeResolver {
    fn without(missing: &[EntryPoint]) -> Self {
        Self {
            missing: missing.to_vec(),
            ..Default::default()
        }
    }

    fn lookups(&self, entry: EntryPoint) -> usize {
        self.lookups
            .borrow()
            .get(entry.name())
            .copied()
            .unwrap_or(0)
    }
}

impl SymbolResolver for FakeResolver {
    fn resolve(&self, symbol: &CStr) -> Option<usize> {
        let name = symbol.to_str().ok()?;
        *self.lookups.borrow_mut().entry(name.to_string()).or_default() += 1;

        let entry = EntryPoint::ALL.into_iter().find(|e| e.name() == name)?;
        if self.missing.contains(&entry) {
            return None;
        }
        let addr = match entry {
            EntryPoint::GtkMain => fake_gtk_main as usize,
            EntryPoint::ApplicationRun => fake_application_run as usize,
            EntryPoint::MainIterationDo => fake_main_iteration_do as usize,
            EntryPoint::SetDeveloperExtras => fake_set_developer_extras as usize,
        };
        Some(addr)
    }
}

#[test]
fn test_disable_request_forwards_true() {
    let cache = SymbolCache::new();
    let resolver = FakeResolver::default();
    let interceptor = Interceptor::new(&cache, &resolver);

    for requested in [GFALSE, GTRUE, GFALSE] {
        LAST_EXTRAS.with(|c| c.set(None));
        unsafe { interceptor.set_developer_extras(ptr::null_mut(), requested) };
        assert_eq!(LAST_EXTRAS.with(Cell::get), Some(GTRUE));
    }
    assert_eq!(resolver.lookups(EntryPoint::SetDeveloperExtras), 1);
}

#[test]
fn test_gtk_main_installs_then_forwards() {
    let cache = SymbolCache::new();
    let resolver = FakeResolver::default();
    let interceptor = Interceptor::new(&cache, &resolver);
    let before = GTK_MAIN_CALLS.with(Cell::get);

    let installed = Cell::new(None);
    interceptor.gtk_main(|entry| installed.set(Some(entry)));

    assert_eq!(installed.get(), Some(EntryPoint::GtkMain));
    assert_eq!(GTK_MAIN_CALLS.with(Cell::get), before + 1);
}

#[test]
fn test_application_run_passes_arguments_and_status() {
    let cache = SymbolCache::new();
    let resolver = FakeResolver::default();
    let interceptor = Interceptor::new(&cache, &resolver);

    let status = unsafe { interceptor.application_run(ptr::null_mut(), 3, ptr::null_mut(), |_| {}) };

    assert_eq!(status, 42);
    assert_eq!(LAST_ARGC.with(Cell::get), Some(3));
}

#[test]
fn test_main_iteration_forwards_blocking_flag() {
    let cache = SymbolCache::new();
    let resolver = FakeResolver::default();
    let interceptor = Interceptor::new(&cache, &resolver);

    let installs = Cell::new(0);
    for blocking in [GFALSE, GTRUE] {
        let result = interceptor.main_iteration_do(blocking, |_| installs.set(installs.get() + 1));
        assert_eq!(result, GTRUE);
        assert_eq!(LAST_BLOCKING.with(Cell::get), Some(blocking));
    }
    // Idempotence is the installer's job; the hook offers it every turn
    assert_eq!(installs.get(), 2);
    assert_eq!(resolver.lookups(EntryPoint::MainIterationDo), 1);
}

#[test]
fn test_missing_original_degrades_without_install() {
    let cache = SymbolCache::new();
    let resolver = FakeResolver::without(&EntryPoint::ALL);
    let interceptor = Interceptor::new(&cache, &resolver);

    let installs = Cell::new(0);
    let install = |_: EntryPoint| installs.set(installs.get() + 1);

    interceptor.gtk_main(install);
    interceptor.gtk_main(install);
    let status = unsafe { interceptor.application_run(ptr::null_mut(), 0, ptr::null_mut(), install) };
    let iterated = interceptor.main_iteration_do(GTRUE, install);
    unsafe { interceptor.set_developer_extras(ptr::null_mut(), GFALSE) };

    assert_eq!(installs.get(), 0);
    assert_eq!(status, 1);
    assert_eq!(iterated, GFALSE);
    // The failure is cached: no second lookup
    assert_eq!(resolver.lookups(EntryPoint::GtkMain), 1);
    assert_eq!(cache.cached(EntryPoint::GtkMain), Some(None));
}

#[test]
fn test_cache_is_per_entry_point() {
    let cache = SymbolCache::new();
    let resolver = FakeResolver::without(&[EntryPoint::GtkMain]);

    assert_eq!(cache.resolve(EntryPoint::GtkMain, &resolver), None);
    assert_eq!(
        cache.resolve(EntryPoint::MainIterationDo, &resolver),
        Some(fake_main_iteration_do as usize)
    );
    assert_eq!(cache.cached(EntryPoint::ApplicationRun), None);
    assert!(EntryPoint::GtkMain.enters_main_loop());
    assert!(!EntryPoint::SetDeveloperExtras.enters_main_loop());
}
