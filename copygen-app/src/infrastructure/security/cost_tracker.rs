use chrono::{DateTime, NaiveDate, Utc};
use copygen_errors::AppError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Daily ceilings on generation calls and on their estimated spend, reset at
/// UTC midnight.
pub struct CostTracker {
    daily_request_limit: u32,
    daily_cost_limit_cents: u32,
    cost_per_request_cents: u32,
    daily_requests: AtomicU32,
    daily_cost_cents: AtomicU32,
    current_day: Mutex<NaiveDate>,
}

impl CostTracker {
    pub fn new(
        daily_request_limit: u32,
        daily_cost_limit_cents: u32,
        cost_per_request_cents: u32,
    ) -> Self {
        Self {
            daily_request_limit,
            daily_cost_limit_cents,
            cost_per_request_cents,
            daily_requests: AtomicU32::new(0),
            daily_cost_cents: AtomicU32::new(0),
            current_day: Mutex::new(Utc::now().date_naive()),
        }
    }

    pub fn check_and_increment(&self) -> Result<(), CostLimitError> {
        self.check_and_increment_at(Utc::now())
    }

    fn check_and_increment_at(&self, now: DateTime<Utc>) -> Result<(), CostLimitError> {
        // Held across the check so both counters move together.
        let mut current_day = self
            .current_day
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if now.date_naive() != *current_day {
            self.daily_requests.store(0, Ordering::SeqCst);
            self.daily_cost_cents.store(0, Ordering::SeqCst);
            *current_day = now.date_naive();
            tracing::info!("Daily cost tracker reset");
        }

        let requests = self.daily_requests.load(Ordering::SeqCst);
        let cost = self.daily_cost_cents.load(Ordering::SeqCst);

        if requests >= self.daily_request_limit {
            return Err(CostLimitError::DailyRequestLimitReached);
        }
        if cost.saturating_add(self.cost_per_request_cents) > self.daily_cost_limit_cents {
            tracing::warn!("Daily cost ceiling reached at {} cents", cost);
            return Err(CostLimitError::DailyCostLimitReached);
        }

        self.daily_requests.fetch_add(1, Ordering::SeqCst);
        self.daily_cost_cents
            .fetch_add(self.cost_per_request_cents, Ordering::SeqCst);

        Ok(())
    }

    pub fn get_remaining_requests(&self) -> u32 {
        self.daily_request_limit
            .saturating_sub(self.daily_requests.load(Ordering::SeqCst))
    }

    pub fn get_spent_cents(&self) -> u32 {
        self.daily_cost_cents.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CostLimitError {
    #[error("오늘의 생성 한도에 도달했습니다. 내일 다시 시도해주세요.")]
    DailyRequestLimitReached,
    #[error("오늘의 예산을 모두 사용했습니다. 내일 다시 시도해주세요.")]
    DailyCostLimitReached,
}

impl From<CostLimitError> for AppError {
    fn from(err: CostLimitError) -> Self {
        AppError::RateLimited(err.to_string())
    }
}
