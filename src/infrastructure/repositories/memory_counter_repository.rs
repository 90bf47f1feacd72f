use super::counter_repository::{rank_members, CounterRepository, CounterStoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Counters {
    values: HashMap<String, i64>,
    tables: HashMap<String, HashMap<String, i64>>,
}

/// In-process counter store; counts are lost on restart
#[derive(Default)]
pub struct InMemoryCounterRepository {
    counters: Mutex<Counters>,
}

impl InMemoryCounterRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterRepository for InMemoryCounterRepository {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn increment(&self, key: &str) -> Result<i64, CounterStoreError> {
        let mut counters = self.counters.lock().await;
        let value = counters.values.entry(key.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, CounterStoreError> {
        Ok(self.counters.lock().await.values.get(key).copied())
    }

    async fn increment_member(&self, table: &str, member: &str) -> Result<(), CounterStoreError> {
        let mut counters = self.counters.lock().await;
        *counters
            .tables
            .entry(table.to_string())
            .or_default()
            .entry(member.to_string())
            .or_insert(0) += 1;
        Ok(())
    }

    async fn top_members(
        &self,
        table: &str,
        limit: usize,
    ) -> Result<Vec<(String, i64)>, CounterStoreError> {
        let counters = self.counters.lock().await;
        let members = counters.tables.get(table).cloned().unwrap_or_default();
        Ok(rank_members(members, limit))
    }
}
