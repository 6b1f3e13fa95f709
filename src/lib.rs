//! spy - WebKitGTK inspector injection
//!
//! Built as `libspy.so` and loaded with `LD_PRELOAD` into a GTK/WebKit
//! application. It interposes the event-loop entry points, waits in an idle
//! callback until the widget tree contains `WebKitWebView`s, enables the
//! developer extras on each and binds Ctrl+Shift+I to toggle the inspector.
//!
//! The `tauri-spy` launcher links this crate for its shared constants and
//! error types only; target validation and process setup live in the binary
//! so none of it is loaded into the target.

pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod host;
pub mod inspector;
pub mod intercept;
pub mod logging;

pub use context::SpyContext;
pub use error::{LaunchError, SpyError};
