//! Time calculation utilities shared by transitions, timelines and the marquee

use std::time::{Duration, Instant};

/// Calculate animation progress (0.0 to 1.0) from elapsed time and duration
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Progress of an animation that started at `start`
#[inline]
pub fn progress_since(start: Instant, duration: Duration) -> f64 {
    progress(start.elapsed(), duration)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Linear interpolation for u16 values (scroll positions)
#[inline]
pub fn lerp_u16(from: u16, to: u16, t: f64) -> u16 {
    lerp(from as f64, to as f64, t).round() as u16
}

/// Milliseconds rendered the way CSS expects them, e.g. `200ms`
pub fn css_millis(ms: u64) -> String {
    format!("{}ms", ms)
}
