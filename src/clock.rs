//! Monotonic clock for the refresh schedule
//!
//! Times are seconds since the first call, as `f64`.

use std::time::Duration;

#[cfg(target_arch = "wasm32")]
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Time left until `due`, zero when already past
pub fn until(due: f64, now: f64) -> Duration {
    let left = due - now;
    if left.is_finite() && left > 0.0 {
        Duration::from_secs_f64(left)
    } else {
        Duration::ZERO
    }
}
