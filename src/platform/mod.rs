//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Run seeds (wall clock)
//! - Logger setup

/// Seed for a new run, taken from the wall clock
#[cfg(target_arch = "wasm32")]
pub fn time_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Route `log` output to the browser console and panics to `console.error`
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }
}

/// `env_logger` with `info` unless `RUST_LOG` says otherwise
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_seed_is_nonzero() {
        assert!(time_seed() > 0);
    }
}
