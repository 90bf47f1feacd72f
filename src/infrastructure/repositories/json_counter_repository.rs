use super::counter_repository::{rank_members, CounterRepository, CounterStoreError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StatsFile {
    #[serde(default)]
    counters: HashMap<String, i64>,
    #[serde(default)]
    tables: HashMap<String, HashMap<String, i64>>,
}

/// Counter store persisted to a local JSON file.
///
/// The whole file is rewritten on every increment (temp file + rename) while
/// holding the lock, so concurrent requests in this process never lose counts.
pub struct JsonFileCounterRepository {
    path: PathBuf,
    state: Mutex<Option<StatsFile>>,
}

impl JsonFileCounterRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Mutex::new(None),
        }
    }

    async fn load(&self) -> Result<StatsFile, CounterStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) if raw.iter().all(u8::is_ascii_whitespace) => Ok(StatsFile::default()),
            Ok(raw) => Ok(serde_json::from_slice(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StatsFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, stats: &StatsFile) -> Result<(), CounterStoreError> {
        let raw = serde_json::to_vec_pretty(stats)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `update` to the loaded stats and write them back
    async fn update<T>(
        &self,
        update: impl FnOnce(&mut StatsFile) -> T + Send,
    ) -> Result<T, CounterStoreError> {
        let mut guard = self.state.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        let stats = guard
            .as_mut()
            .ok_or_else(|| CounterStoreError::Unavailable("stats not loaded".to_string()))?;

        let result = update(stats);
        self.persist(stats).await?;
        Ok(result)
    }

    async fn read<T>(&self, read: impl FnOnce(&StatsFile) -> T + Send) -> Result<T, CounterStoreError> {
        let mut guard = self.state.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        guard
            .as_ref()
            .map(read)
            .ok_or_else(|| CounterStoreError::Unavailable("stats not loaded".to_string()))
    }
}

#[async_trait]
impl CounterRepository for JsonFileCounterRepository {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn increment(&self, key: &str) -> Result<i64, CounterStoreError> {
        self.update(|stats| {
            let value = stats.counters.entry(key.to_string()).or_insert(0);
            *value += 1;
            *value
        })
        .await
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, CounterStoreError> {
        self.read(|stats| stats.counters.get(key).copied()).await
    }

    async fn increment_member(&self, table: &str, member: &str) -> Result<(), CounterStoreError> {
        self.update(|stats| {
            *stats
                .tables
                .entry(table.to_string())
                .or_default()
                .entry(member.to_string())
                .or_insert(0) += 1;
        })
        .await
    }

    async fn top_members(
        &self,
        table: &str,
        limit: usize,
    ) -> Result<Vec<(String, i64)>, CounterStoreError> {
        let members = self
            .read(|stats| stats.tables.get(table).cloned().unwrap_or_default())
            .await?;
        Ok(rank_members(members, limit))
    }
}
