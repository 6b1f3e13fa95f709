//! Intercept module - entry-point interposition.
//!
//! The library is preloaded ahead of GTK/WebKit, so the dynamic loader binds
//! the target's calls to the functions in [`exports`]. Each one finds the
//! original implementation further down the lookup chain, performs its side
//! effect and forwards the call unchanged.
//!
//! The forwarding logic lives in [`Interceptor`], which takes its originals
//! from a [`SymbolCache`] filled by a [`SymbolResolver`]. The exports wire the
//! process-wide cache to `dlsym(RTLD_NEXT, ..)`; tests plug in fakes.

pub mod exports;

#[cfg(test)]
mod tests;

use std::ffi::{c_char, c_int, c_void, CStr};
use std::mem;
use std::sync::OnceLock;

use crate::error::SpyError;
use crate::host::ffi::{
    gboolean, ApplicationRunFn, GtkMainFn, MainIterationDoFn, SetDeveloperExtrasFn, GFALSE, GTRUE,
};

/// The intercepted host functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// `gtk_main()`
    GtkMain,
    /// `g_application_run()`, used by GtkApplication based apps
    ApplicationRun,
    /// `gtk_main_iteration_do()`, used by tao's hand-rolled event loop
    MainIterationDo,
    /// `webkit_settings_set_enable_developer_extras()`
    SetDeveloperExtras,
}

impl EntryPoint {
    pub const ALL: [EntryPoint; 4] = [
        EntryPoint::GtkMain,
        EntryPoint::ApplicationRun,
        EntryPoint::MainIterationDo,
        EntryPoint::SetDeveloperExtras,
    ];

    pub fn symbol(self) -> &'static CStr {
        match self {
            EntryPoint::GtkMain => c"gtk_main",
            EntryPoint::ApplicationRun => c"g_application_run",
            EntryPoint::MainIterationDo => c"gtk_main_iteration_do",
            EntryPoint::SetDeveloperExtras => c"webkit_settings_set_enable_developer_extras",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EntryPoint::GtkMain => "gtk_main",
            EntryPoint::ApplicationRun => "g_application_run",
            EntryPoint::MainIterationDo => "gtk_main_iteration_do",
            EntryPoint::SetDeveloperExtras => "webkit_settings_set_enable_developer_extras",
        }
    }

    /// Whether calling this entry point means the host loop is about to run
    pub fn enters_main_loop(self) -> bool {
        !matches!(self, EntryPoint::SetDeveloperExtras)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Finds the original definition of an intercepted symbol
pub trait SymbolResolver {
    fn resolve(&self, symbol: &CStr) -> Option<usize>;
}

/// Searches the libraries loaded after this one, skipping our own exports
#[derive(Debug, Default, Clone, Copy)]
pub struct NextResolver;

impl SymbolResolver for NextResolver {
    fn resolve(&self, symbol: &CStr) -> Option<usize> {
        let addr = unsafe { libc::dlsym(libc::RTLD_NEXT, symbol.as_ptr()) };
        if addr.is_null() {
            None
        } else {
            Some(addr as usize)
        }
    }
}

/// One write-once address slot per entry point.
///
/// A failed lookup is cached as well: resolution is attempted at most once
/// per name for the lifetime of the process.
pub struct SymbolCache {
    slots: [OnceLock<Option<usize>>; 4],
}

impl SymbolCache {
    pub const fn new() -> Self {
        Self {
            slots: [
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
            ],
        }
    }

    pub fn resolve(&self, entry: EntryPoint, resolver: &dyn SymbolResolver) -> Option<usize> {
        *self.slots[entry.slot()].get_or_init(|| {
            let addr = resolver.resolve(entry.symbol());
            match addr {
                Some(addr) => log::debug!("Resolved real {}() at {:#x}", entry.name(), addr),
                None => log::error!("{}", SpyError::UnresolvedSymbol { name: entry.name() }),
            }
            addr
        })
    }

    /// Cached result without triggering a lookup
    pub fn cached(&self, entry: EntryPoint) -> Option<Option<usize>> {
        self.slots[entry.slot()].get().copied()
    }
}

impl Default for SymbolCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwarding logic for the intercepted entry points
pub struct Interceptor<'a> {
    symbols: &'a SymbolCache,
    resolver: &'a dyn SymbolResolver,
}

impl<'a> Interceptor<'a> {
    pub fn new(symbols: &'a SymbolCache, resolver: &'a dyn SymbolResolver) -> Self {
        Self { symbols, resolver }
    }

    /// Typed original for `entry`; `F` must be the entry point's C signature.
    fn original<F: Copy>(&self, entry: EntryPoint) -> Option<F> {
        debug_assert_eq!(mem::size_of::<F>(), mem::size_of::<usize>());
        self.symbols
            .resolve(entry, self.resolver)
            .map(|addr| unsafe { mem::transmute_copy::<usize, F>(&addr) })
    }

    /// The real WebKit setter, for callers that must not hit our override
    pub fn original_set_developer_extras(&self) -> Option<SetDeveloperExtrasFn> {
        self.original(EntryPoint::SetDeveloperExtras)
    }

    /// `gtk_main()`: without the original there is no loop to enter, so do nothing.
    pub fn gtk_main(&self, install: impl FnOnce(EntryPoint)) {
        let Some(real) = self.original::<GtkMainFn>(EntryPoint::GtkMain) else {
            return;
        };
        install(EntryPoint::GtkMain);
        unsafe { real() }
    }

    /// `g_application_run()`: reports failure status 1 when the original is missing.
    ///
    /// # Safety
    /// `application` and `argv` are passed through untouched and must satisfy
    /// the original's contract.
    pub unsafe fn application_run(
        &self,
        application: *mut c_void,
        argc: c_int,
        argv: *mut *mut c_char,
        install: impl FnOnce(EntryPoint),
    ) -> c_int {
        let Some(real) = self.original::<ApplicationRunFn>(EntryPoint::ApplicationRun) else {
            return 1;
        };
        install(EntryPoint::ApplicationRun);
        real(application, argc, argv)
    }

    /// `gtk_main_iteration_do()`: called on every loop turn, `install` must be idempotent.
    pub fn main_iteration_do(&self, blocking: gboolean, install: impl FnOnce(EntryPoint)) -> gboolean {
        let Some(real) = self.original::<MainIterationDoFn>(EntryPoint::MainIterationDo) else {
            return GFALSE;
        };
        install(EntryPoint::MainIterationDo);
        unsafe { real(blocking) }
    }

    /// `webkit_settings_set_enable_developer_extras()`: always forwards `TRUE`.
    ///
    /// # Safety
    /// `settings` is passed through untouched to the original.
    pub unsafe fn set_developer_extras(&self, settings: *mut c_void, enabled: gboolean) {
        let Some(real) = self.original_set_developer_extras() else {
            return;
        };
        real(settings, GTRUE);
        if enabled == GFALSE {
            log::warn!("Blocked attempt to disable DevTools, kept enabled");
        }
    }
}
