#![warn(clippy::all, rust_2018_idioms)]

/// Logging macros that prefix each message with `[file:module:line]`.
///
/// `log_*` go through the `log` facade; `tracing_log::LogTracer` forwards them to the
/// tracing subscriber installed by the binary. `trace_*` go to `tracing` directly and
/// are meant for chatty diagnostics such as per-page pagination details.
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        log::trace!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}

/// Tracing-only variant
#[macro_export]
macro_rules! trace_trace {
    ($($arg:tt)*) => {
        tracing::trace!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}

/*
Level guidelines:

TRACE: per-page pagination details, individual poll responses
DEBUG: SDK client setup, config file loading, lookup results
INFO:  operator-visible progress (selected task definition, query id, row counts)
WARN:  recoverable problems (a log stream that could not be read, ignored options)
ERROR: the failure that ends the run, logged once by main
*/
