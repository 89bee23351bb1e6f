use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

use crate::repositories::flag::{FlagResult, FlagStore};

/// The prefix applied to every flag key stored in Redis.
const KEY_PREFIX: &str = "medmentor";

/// A flag store backed by Redis.
#[derive(Clone)]
pub struct RedisFlagStore {
    redis: ConnectionManager,
}

impl RedisFlagStore {
    /// Connects to the Redis server at `url`.
    pub async fn connect(url: &str) -> FlagResult<Self> {
        let client = redis::Client::open(url)?;
        let redis = ConnectionManager::new(client).await?;
        tracing::info!("✅ Redis Connection Manager initialized for flag storage");
        Ok(Self { redis })
    }

    fn key(key: &str) -> String {
        format!("{}:{}", KEY_PREFIX, key)
    }
}

#[async_trait]
impl FlagStore for RedisFlagStore {
    async fn read(&self, key: &str) -> FlagResult<Option<String>> {
        let mut redis = self.redis.clone();
        let value: Option<String> = redis.get(Self::key(key)).await?;
        Ok(value)
    }

    async fn write(&self, key: &str, value: &str) -> FlagResult<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.set(Self::key(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> FlagResult<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.del(Self::key(key)).await?;
        Ok(())
    }
}
