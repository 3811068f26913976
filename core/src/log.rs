//! Logging utilities
//!
//! Thin helpers over the `log` facade. Nothing is printed unless the host
//! installs a logger (the wasm client uses `console_log`).

#![allow(unused)]

/// Log an info message
#[inline(always)]
pub fn info(msg: &str) {
    ::log::info!("{}", msg);
}

/// Log a warning message
#[inline(always)]
pub fn warn(msg: &str) {
    ::log::warn!("{}", msg);
}

/// Log an error message
#[inline(always)]
pub fn error(msg: &str) {
    ::log::error!("{}", msg);
}

/// Log a debug message with a label
#[inline(always)]
pub fn debug(label: &str, msg: &str) {
    ::log::debug!("[{}] {}", label, msg);
}

/// Log game state summary
#[inline(always)]
pub fn state_summary(
    now: u64,
    moves: u32,
    disclosed: usize,
    total_pairs: usize,
    active: usize,
    pending_tasks: usize,
) {
    ::log::debug!(
        "t={}ms moves={} disclosed={}/{} active={} pending={}",
        now,
        moves,
        disclosed,
        total_pairs,
        active,
        pending_tasks
    );
}

/// Log an action being performed
#[inline(always)]
pub fn action(name: &str, details: &str) {
    ::log::info!("> {}: {}", name, details);
}

/// Log action result
#[inline(always)]
pub fn result(success: bool, msg: &str) {
    if success {
        ::log::info!("ok: {}", msg);
    } else {
        ::log::warn!("failed: {}", msg);
    }
}
