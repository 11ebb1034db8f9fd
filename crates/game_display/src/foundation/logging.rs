//! Logging utilities and the redirectable trace sink
//!
//! Diagnostics go through the `log` facade. On top of it sits a trace sink:
//! an enable flag plus a replaceable handler, so a host can capture display
//! traces in its own console without touching the global logger.

pub use log::{debug, error, info, trace, warn};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Handler receiving formatted trace output
pub type TraceHandler = Box<dyn Fn(&fmt::Arguments<'_>) + Send + Sync>;

static TRACE_ENABLED: AtomicBool = AtomicBool::new(false);
static TRACE_HANDLER: RwLock<Option<TraceHandler>> = RwLock::new(None);

/// Held by tests that flip the trace switch
#[cfg(test)]
pub(crate) static TRACE_SWITCH_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Initialize the logging system
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    if env_logger::try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Turn trace output on or off
pub fn set_trace_enabled(enabled: bool) {
    TRACE_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether trace output is on
pub fn trace_enabled() -> bool {
    TRACE_ENABLED.load(Ordering::Relaxed)
}

/// Replace the trace handler; `None` restores forwarding to `log`
pub fn set_trace_handler(handler: Option<TraceHandler>) {
    match TRACE_HANDLER.write() {
        Ok(mut slot) => *slot = handler,
        Err(poisoned) => *poisoned.into_inner() = handler,
    }
}

/// Write trace output when tracing is enabled
pub fn write_trace(args: fmt::Arguments<'_>) {
    if trace_enabled() {
        write_trace_always(args);
    }
}

/// Write trace output regardless of the enable flag
pub fn write_trace_always(args: fmt::Arguments<'_>) {
    let slot = match TRACE_HANDLER.read() {
        Ok(slot) => slot,
        Err(poisoned) => poisoned.into_inner(),
    };
    match slot.as_ref() {
        Some(handler) => handler(&args),
        None => log::info!(target: "game_display::trace", "{args}"),
    }
}

/// Format and write a trace line when tracing is enabled
#[macro_export]
macro_rules! display_trace {
    ($($arg:tt)*) => {
        $crate::foundation::logging::write_trace(format_args!($($arg)*))
    };
}
