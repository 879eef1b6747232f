use std::collections::VecDeque;
use std::time::Duration;

use tenure_core::RateLimitSettings;
use tenure_logging::{tenure_debug, tenure_info, tenure_trace};
use tokio::time::{sleep, Instant};

/// Sliding-window limiter: at most `max_calls` admissions in any `window`.
///
/// Only admitted timestamps are kept, so a rejected caller never extends its
/// own wait.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    admitted: VecDeque<Instant>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitSettings::default())
    }
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            max_calls: settings.max_calls.max(1),
            window: settings.window,
            admitted: VecDeque::new(),
        }
    }

    /// Waits until a slot is free, then records the call.
    pub async fn throttle(&mut self) {
        let now = Instant::now();
        self.prune(now);
        if self.admitted.len() >= self.max_calls {
            if let Some(&oldest) = self.admitted.front() {
                let wait = self.window.saturating_sub(now.duration_since(oldest));
                tenure_info!("Rate limit reached; waiting {} ms", wait.as_millis());
                sleep(wait).await;
            }
            self.prune(Instant::now());
        }
        self.admitted.push_back(Instant::now());
        tenure_trace!("Call admitted; {} in window", self.admitted.len());
    }

    pub fn reset(&mut self) {
        self.admitted.clear();
    }

    pub fn in_window(&self) -> usize {
        self.admitted.len()
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.admitted.front() {
            if now.duration_since(oldest) < self.window {
                break;
            }
            self.admitted.pop_front();
        }
    }
}

/// Minimum spacing between two consecutive operations.
#[derive(Debug)]
pub struct Cooldown {
    interval: Duration,
    last: Option<Instant>,
}

impl Cooldown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let remaining = self.interval.saturating_sub(last.elapsed());
            if !remaining.is_zero() {
                tenure_debug!("Cooling down for {} ms", remaining.as_millis());
                sleep(remaining).await;
            }
        }
        self.last = Some(Instant::now());
    }
}
