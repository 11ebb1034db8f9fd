//! Fatal-error reporting
//!
//! [`abort_with_message`] is the last stop for unrecoverable failures. The
//! message goes to the installed handler (a dialog, a crash reporter) or, by
//! default, to the error log, and the process then exits with status 1.

use std::fmt;
use std::sync::RwLock;

/// Handler shown the title and message of a fatal error
pub type AbortHandler = Box<dyn Fn(&str, &str) + Send + Sync>;

static ABORT_HANDLER: RwLock<Option<AbortHandler>> = RwLock::new(None);

/// Exit status used by [`abort_with_message`]
pub const ABORT_EXIT_STATUS: i32 = 1;

/// Replace the abort handler; `None` restores logging
pub fn set_abort_handler(handler: Option<AbortHandler>) {
    match ABORT_HANDLER.write() {
        Ok(mut slot) => *slot = handler,
        Err(poisoned) => *poisoned.into_inner() = handler,
    }
}

/// Report a fatal error without exiting
pub fn report_fatal(title: &str, args: fmt::Arguments<'_>) {
    let message = args.to_string();
    let slot = match ABORT_HANDLER.read() {
        Ok(slot) => slot,
        Err(poisoned) => poisoned.into_inner(),
    };
    match slot.as_ref() {
        Some(handler) => handler(title, &message),
        None => log::error!("{title}: {message}"),
    }
}

/// Report a fatal error and terminate the process
pub fn abort_with_message(title: &str, args: fmt::Arguments<'_>) -> ! {
    report_fatal(title, args);
    log::logger().flush();
    std::process::exit(ABORT_EXIT_STATUS)
}
