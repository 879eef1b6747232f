use std::time::Duration;

use tenure_core::RateLimitSettings;
use tenure_engine::{Cooldown, RateLimiter};
use tokio::time::{advance, Instant};

fn three_per_minute() -> RateLimiter {
    RateLimiter::new(RateLimitSettings {
        max_calls: 3,
        window: Duration::from_secs(60),
    })
}

#[tokio::test(start_paused = true)]
async fn calls_under_the_limit_pass_immediately() {
    let mut limiter = three_per_minute();
    let start = Instant::now();
    for _ in 0..3 {
        limiter.throttle().await;
    }
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(limiter.in_window(), 3);
}

#[tokio::test(start_paused = true)]
async fn call_over_the_limit_waits_for_the_oldest_to_expire() {
    let mut limiter = three_per_minute();
    let start = Instant::now();
    for _ in 0..3 {
        limiter.throttle().await;
    }
    advance(Duration::from_secs(10)).await;

    limiter.throttle().await;

    let waited = start.elapsed();
    assert!(waited >= Duration::from_secs(60), "waited {waited:?}");
    assert!(waited < Duration::from_secs(61), "waited {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn no_wait_once_the_window_has_passed() {
    let mut limiter = three_per_minute();
    for _ in 0..3 {
        limiter.throttle().await;
    }
    advance(Duration::from_secs(61)).await;

    let before = Instant::now();
    limiter.throttle().await;
    assert_eq!(before.elapsed(), Duration::ZERO);
    assert_eq!(limiter.in_window(), 1);
}

#[tokio::test(start_paused = true)]
async fn reset_forgets_history() {
    let mut limiter = three_per_minute();
    for _ in 0..3 {
        limiter.throttle().await;
    }
    limiter.reset();

    let before = Instant::now();
    limiter.throttle().await;
    assert_eq!(before.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn cooldown_spaces_consecutive_operations() {
    let mut cooldown = Cooldown::new(Duration::from_secs(8));
    let start = Instant::now();
    cooldown.wait().await;
    assert_eq!(start.elapsed(), Duration::ZERO);

    advance(Duration::from_secs(3)).await;
    cooldown.wait().await;
    assert_eq!(start.elapsed(), Duration::from_secs(8));
}
