use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;

#[derive(Clone, Debug)]
pub struct RedisCounterStore {
    pool: Pool,
}

impl RedisCounterStore {
    pub fn from_url(redis_url: &str) -> anyhow::Result<Self> {
        let config = Config::from_url(redis_url);
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| anyhow::anyhow!("failed to create redis pool: {e}"))?;

        Ok(Self { pool })
    }

    async fn connection(&self) -> anyhow::Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| anyhow::anyhow!("failed to get redis connection: {e}"))
    }

    pub async fn get(&self, key: &str) -> anyhow::Result<Option<u64>> {
        let mut conn = self.connection().await?;

        let value = conn
            .get::<_, Option<u64>>(key)
            .await
            .map_err(|e| anyhow::anyhow!("redis GET failed for key `{key}`: {e}"))?;

        Ok(value)
    }

    /// INCR and EXPIRE in one MULTI/EXEC, so a counted key always carries a TTL.
    pub async fn incr_with_expiry(&self, key: &str, ttl_seconds: u64) -> anyhow::Result<u64> {
        let mut conn = self.connection().await?;
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);

        let (count,): (u64,) = redis::pipe()
            .atomic()
            .incr(key, 1_u64)
            .expire(key, ttl)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| anyhow::anyhow!("redis INCR/EXPIRE failed for key `{key}`: {e}"))?;

        Ok(count)
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self.connection().await?;

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| anyhow::anyhow!("redis PING failed: {e}"))?;

        Ok(())
    }
}
