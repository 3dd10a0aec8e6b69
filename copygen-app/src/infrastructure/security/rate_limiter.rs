use copygen_errors::AppError;
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(3600);
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Clone)]
struct RequestWindow {
    minute_count: u32,
    hour_count: u32,
    minute_start: Instant,
    hour_start: Instant,
}

impl RequestWindow {
    fn starting_at(now: Instant) -> Self {
        Self {
            minute_count: 0,
            hour_count: 0,
            minute_start: now,
            hour_start: now,
        }
    }
}

/// Per-client fixed-window limiter, one minute and one hour window per IP.
#[derive(Clone)]
pub struct RateLimiter {
    per_minute: u32,
    per_hour: u32,
    windows: Arc<DashMap<IpAddr, RequestWindow>>,
    last_cleanup: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    pub fn new(per_minute: u32, per_hour: u32) -> Self {
        Self {
            per_minute,
            per_hour,
            windows: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn check_rate_limit(&self, ip: IpAddr) -> Result<(), RateLimitError> {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), RateLimitError> {
        self.maybe_cleanup(now);

        let mut window = self
            .windows
            .entry(ip)
            .or_insert_with(|| RequestWindow::starting_at(now));

        if now.saturating_duration_since(window.minute_start) >= MINUTE {
            window.minute_count = 0;
            window.minute_start = now;
        }
        if now.saturating_duration_since(window.hour_start) >= HOUR {
            window.hour_count = 0;
            window.hour_start = now;
        }

        if window.minute_count >= self.per_minute {
            let elapsed = now.saturating_duration_since(window.minute_start);
            return Err(RateLimitError::PerMinute(
                MINUTE.saturating_sub(elapsed).as_secs().max(1),
            ));
        }
        if window.hour_count >= self.per_hour {
            let elapsed = now.saturating_duration_since(window.hour_start);
            return Err(RateLimitError::PerHour(
                HOUR.saturating_sub(elapsed).as_secs().max(1),
            ));
        }

        window.minute_count += 1;
        window.hour_count += 1;
        Ok(())
    }

    fn maybe_cleanup(&self, now: Instant) {
        let Ok(mut last_cleanup) = self.last_cleanup.lock() else {
            return;
        };
        if now.saturating_duration_since(*last_cleanup) > CLEANUP_INTERVAL {
            self.windows
                .retain(|_, w| now.saturating_duration_since(w.hour_start) < HOUR);
            *last_cleanup = now;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    #[error("요청이 너무 많습니다. {0}초 후에 다시 시도해주세요.")]
    PerMinute(u64),
    #[error("시간당 요청 한도에 도달했습니다. {}분 후에 다시 시도해주세요.", .0.div_ceil(60))]
    PerHour(u64),
}

impl From<RateLimitError> for AppError {
    fn from(err: RateLimitError) -> Self {
        AppError::RateLimited(err.to_string())
    }
}
