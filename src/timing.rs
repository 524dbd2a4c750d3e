use std::time::{Duration, Instant};

/// Start-of-request snapshot carried in the request extensions until the
/// response is ready.
#[derive(Debug, Clone)]
pub struct RequestTiming {
    pub method: String,
    pub path: String,
    pub started: Instant,
}

impl RequestTiming {
    pub fn start(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Elapsed {
        Elapsed::from(self.started.elapsed())
    }
}

/// A request duration in whichever unit the caller measured it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Elapsed {
    /// `(seconds, nanoseconds)` as produced by a high-resolution timer.
    HrTime(u64, u32),
    Millis(f64),
}

impl Elapsed {
    pub fn as_millis(&self) -> f64 {
        match *self {
            Elapsed::HrTime(secs, nanos) => secs as f64 * 1000.0 + nanos as f64 / 1_000_000.0,
            Elapsed::Millis(ms) => ms,
        }
    }

    /// Milliseconds rounded to two decimals, without trailing zeros.
    pub fn display_millis(&self) -> String {
        format!("{}ms", round_to(self.as_millis(), 2))
    }
}

impl From<Duration> for Elapsed {
    fn from(duration: Duration) -> Self {
        Elapsed::HrTime(duration.as_secs(), duration.subsec_nanos())
    }
}

impl From<(u64, u32)> for Elapsed {
    fn from((secs, nanos): (u64, u32)) -> Self {
        Elapsed::HrTime(secs, nanos)
    }
}

impl From<f64> for Elapsed {
    fn from(ms: f64) -> Self {
        Elapsed::Millis(ms)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
