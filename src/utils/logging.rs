//! Logger bootstrap plus per-module switchable logging macros.
//!
//! A module opts in by declaring its own flag and importing the macros:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_debug, log_info, log_warn};
//!
//! log_info!("corpus cached until {}", expiry);
//! ```
//! Flip the flag to `false` to silence a chatty module without touching
//! `RUST_LOG`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs `env_logger` once. Reads `RUST_LOG`, defaulting to `info`.
///
/// Safe to call from every entry point; a shell that already installed its
/// own logger keeps it.
pub fn init_logging() {
    INIT.call_once(|| {
        let result = env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .try_init();
        if result.is_ok() {
            log::info!("versefeed logging initialised");
        }
    });
}

/// Shared body of the level macros below. Expands to nothing observable when
/// the calling module's `ENABLE_LOGS` is `false`.
#[macro_export]
macro_rules! log_gated {
    ($level:expr, $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::log!($level, $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::log_gated!(log::Level::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::log_gated!(log::Level::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::log_gated!(log::Level::Warn, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::log_gated!(log::Level::Error, $($arg)*)
    };
}
