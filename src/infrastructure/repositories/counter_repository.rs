use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum CounterStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("counter store unavailable: {0}")]
    Unavailable(String),
}

/// External usage counter store.
///
/// Every increment must be atomic at the store level; callers never do a
/// read-modify-write on a counter.
#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Short backend name, reported by the readiness probe
    fn name(&self) -> &'static str;

    /// Atomically add one to `key`, creating it at zero first. Returns the new value.
    async fn increment(&self, key: &str) -> Result<i64, CounterStoreError>;

    /// Current value of `key`, `None` when it was never incremented
    async fn get(&self, key: &str) -> Result<Option<i64>, CounterStoreError>;

    /// Atomically add one to `member` inside the frequency table `table`
    async fn increment_member(&self, table: &str, member: &str) -> Result<(), CounterStoreError>;

    /// Highest-counted members of `table`, descending by count
    async fn top_members(
        &self,
        table: &str,
        limit: usize,
    ) -> Result<Vec<(String, i64)>, CounterStoreError>;
}

/// Store used when accounting is disabled: writes vanish, reads are empty
pub struct NoopCounterRepository;

#[async_trait]
impl CounterRepository for NoopCounterRepository {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn increment(&self, _key: &str) -> Result<i64, CounterStoreError> {
        Ok(0)
    }

    async fn get(&self, _key: &str) -> Result<Option<i64>, CounterStoreError> {
        Ok(None)
    }

    async fn increment_member(&self, _table: &str, _member: &str) -> Result<(), CounterStoreError> {
        Ok(())
    }

    async fn top_members(
        &self,
        _table: &str,
        _limit: usize,
    ) -> Result<Vec<(String, i64)>, CounterStoreError> {
        Ok(Vec::new())
    }
}

/// Sort a frequency table descending by count (ties by name) and truncate
pub(crate) fn rank_members<I>(members: I, limit: usize) -> Vec<(String, i64)>
where
    I: IntoIterator<Item = (String, i64)>,
{
    let mut ranked: Vec<(String, i64)> = members.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}
