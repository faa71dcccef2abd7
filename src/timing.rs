use std::time::{Duration, Instant};

/// Runs `f` once and returns its result with the wall-clock time it took.
pub fn timed<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

pub fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}

pub fn seconds(d: Duration) -> f64 {
    d.as_secs_f64()
}

/// How many times faster `variant` ran than `baseline`. Infinite when the
/// variant was too fast for the clock to register, and NaN when both were.
pub fn speedup(baseline: Duration, variant: Duration) -> f64 {
    baseline.as_secs_f64() / variant.as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_returns_result() {
        let (value, elapsed) = timed(|| (1..=10u32).sum::<u32>());
        assert_eq!(value, 55);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_unit_conversions() {
        assert!((millis(Duration::from_micros(1_500)) - 1.5).abs() < 1e-9);
        assert_eq!(seconds(Duration::from_millis(250)), 0.25);
    }

    #[test]
    fn test_speedup() {
        let ratio = speedup(Duration::from_millis(300), Duration::from_millis(100));
        assert!((ratio - 3.0).abs() < 1e-9);
        assert!(speedup(Duration::from_millis(1), Duration::ZERO).is_infinite());
    }

    #[test]
    fn test_speedup_of_two_zero_durations_is_nan() {
        assert!(speedup(Duration::ZERO, Duration::ZERO).is_nan());
    }
}
