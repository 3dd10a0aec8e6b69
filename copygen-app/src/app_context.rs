use crate::application::GenerateCopy;
use crate::config::Settings;
use crate::domain::{CopyPlan, CopyRequest};
use crate::infrastructure::security::{CostTracker, InputSanitizer, RateLimiter};
use copygen_errors::AppError;
use std::net::IpAddr;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub generate_copy: Arc<GenerateCopy>,
    pub rate_limiter: RateLimiter,
    pub cost_tracker: Arc<CostTracker>,
}

impl AppContext {
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        Ok(Self {
            generate_copy: Arc::new(GenerateCopy::from_settings(settings)?),
            rate_limiter: RateLimiter::new(settings.guard.per_minute, settings.guard.per_hour),
            cost_tracker: Arc::new(CostTracker::new(
                settings.guard.daily_requests,
                settings.guard.daily_cost_cents,
                settings.guard.cost_per_request_cents,
            )),
        })
    }

    /// Validates the request, applies the abuse guards, then generates.
    pub async fn generate(
        &self,
        client_ip: IpAddr,
        request: CopyRequest,
    ) -> Result<CopyPlan, AppError> {
        let request = InputSanitizer::validate_request(request)?;

        self.rate_limiter.check_rate_limit(client_ip)?;
        self.cost_tracker.check_and_increment()?;

        self.generate_copy.execute(request).await
    }
}
