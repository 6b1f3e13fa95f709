//! Logger setup for the injected library.
//!
//! Output goes to the target's stderr, one line per message, tagged with
//! [`LOG_PREFIX`](crate::config::LOG_PREFIX) so it stands out from the
//! application's own output.

use std::io::Write;
use std::sync::Once;

use env_logger::{Builder, Env, Target};
use log::Level;

use crate::config::{LOG_PREFIX, LOG_VAR};

static INIT: Once = Once::new();

/// Install the logger on first use; leaves an existing logger in place.
pub fn init() {
    INIT.call_once(|| {
        let _ = Builder::from_env(Env::default().filter_or(LOG_VAR, "info"))
            .target(Target::Stderr)
            .format(|buf, record| {
                let tag = match record.level() {
                    Level::Error => "FATAL: ",
                    Level::Warn => "WARNING: ",
                    _ => "",
                };
                writeln!(buf, "{} {}{}", LOG_PREFIX, tag, record.args())
            })
            .try_init();
    });
}
