// Math utilities for tick-based movement

/// Move `current` toward `target` by at most `step`, never overshooting
pub fn approach(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else if current > target {
        (current - step).max(target)
    } else {
        current
    }
}

/// Absolute difference between two durations
pub fn abs_diff(a: std::time::Duration, b: std::time::Duration) -> std::time::Duration {
    if a > b {
        a - b
    } else {
        b - a
    }
}
