use super::dto::{LanguageCount, StatsResponse};
use crate::infrastructure::repositories::CounterRepository;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

const TOTAL_KEY: &str = "total";
const LANGUAGES_TABLE: &str = "languages";
const POPULAR_LANGUAGES_LIMIT: usize = 5;

fn daily_key(date: NaiveDate) -> String {
    format!("daily:{}", date.format("%Y-%m-%d"))
}

/// Best-effort usage accounting over an injected counter store.
/// Store failures are logged and never reach the caller.
pub struct UsageService {
    counters: Arc<dyn CounterRepository>,
}

impl UsageService {
    pub fn new(counters: Arc<dyn CounterRepository>) -> Self {
        Self { counters }
    }

    pub fn backend(&self) -> &'static str {
        self.counters.name()
    }

    /// Record one successful conversion for `language`
    pub async fn record_conversion(&self, language: &str) {
        let today = daily_key(Utc::now().date_naive());

        if let Err(e) = self.counters.increment(TOTAL_KEY).await {
            tracing::warn!(error = %e, key = TOTAL_KEY, "Failed to increment usage counter");
        }
        if let Err(e) = self.counters.increment(&today).await {
            tracing::warn!(error = %e, key = %today, "Failed to increment usage counter");
        }
        if let Err(e) = self.counters.increment_member(LANGUAGES_TABLE, language).await {
            tracing::warn!(error = %e, language = language, "Failed to increment language frequency");
        }
    }

    /// Current usage, with zero/empty substituted for anything unreadable
    pub async fn stats(&self) -> StatsResponse {
        let today = daily_key(Utc::now().date_naive());

        let total = self.read_counter(TOTAL_KEY).await;
        let today = self.read_counter(&today).await;
        let popular_languages = match self
            .counters
            .top_members(LANGUAGES_TABLE, POPULAR_LANGUAGES_LIMIT)
            .await
        {
            Ok(members) => members
                .into_iter()
                .map(|(language, count)| LanguageCount { language, count })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read language frequencies");
                Vec::new()
            }
        };

        StatsResponse {
            total,
            today,
            popular_languages,
        }
    }

    async fn read_counter(&self, key: &str) -> i64 {
        match self.counters.get(key).await {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                tracing::warn!(error = %e, key = key, "Failed to read usage counter");
                0
            }
        }
    }
}
