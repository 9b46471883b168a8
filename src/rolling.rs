//! # Rolling Window
//! Sliding time window over recent risk scores (default 24h).
//!
//! Informational only: the `/debug/rolling` endpoint reports the average and
//! sample count so a drift in session-level risk is visible at a glance.

use std::{
    collections::VecDeque,
    sync::Mutex,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Thread-safe rolling time window over risk scores.
#[derive(Debug)]
pub struct RollingWindow {
    inner: Mutex<Inner>,
    window: Duration,
}

#[derive(Debug)]
struct Inner {
    /// Stored samples as `(unix_seconds, score)`.
    buf: VecDeque<(u64, f32)>,
}

impl RollingWindow {
    pub fn with_window(window: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                buf: VecDeque::new(),
            }),
            window,
        }
    }

    /// Convenience constructor for a 24h window.
    pub fn new_24h() -> Self {
        Self::with_window(Duration::from_secs(24 * 3600))
    }

    /// Record a new score. If `ts_unix` is `None`, current time is used.
    /// Entries older than the window are discarded on the way in.
    pub fn record(&self, score: f32, ts_unix: Option<u64>) {
        let now = now_unix();
        let ts = ts_unix.unwrap_or(now);
        let cutoff = now.saturating_sub(self.window.as_secs());

        let mut inner = self.inner.lock().expect("rolling window mutex poisoned");

        inner.buf.push_back((ts, score));
        while let Some(&(t, _)) = inner.buf.front() {
            if t < cutoff {
                inner.buf.pop_front();
            } else {
                break;
            }
        }
    }

    /// Average score and number of samples within the window.
    pub fn average_and_count(&self) -> (f32, usize) {
        let now = now_unix();
        let cutoff = now.saturating_sub(self.window.as_secs());

        let inner = self.inner.lock().expect("rolling window mutex poisoned");
        let mut sum = 0.0f64;
        let mut n: usize = 0;

        for &(t, s) in inner.buf.iter().rev() {
            if t < cutoff {
                break;
            }
            sum += s as f64;
            n += 1;
        }

        let avg = if n > 0 { (sum / n as f64) as f32 } else { 0.0 };
        (avg, n)
    }

    pub fn window_secs(&self) -> u64 {
        self.window.as_secs()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs()
}
