use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::usage::{StatsResponse, UsageService};

pub struct StatsController {
    usage_service: Arc<UsageService>,
}

impl StatsController {
    pub fn new(usage_service: Arc<UsageService>) -> Self {
        Self { usage_service }
    }

    pub fn counter_store(&self) -> &'static str {
        self.usage_service.backend()
    }

    /// GET /stats - Usage counters; never fails
    pub async fn get_stats(State(controller): State<Arc<StatsController>>) -> Json<StatsResponse> {
        Json(controller.usage_service.stats().await)
    }
}
