use sqlx::SqlitePool;

/// Fetch a cached payload that has not expired yet.
pub async fn get(pool: &SqlitePool, cache_key: &str) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT payload FROM image_cache WHERE cache_key = ? AND expires_ts > ?")
            .bind(cache_key)
            .bind(chrono::Utc::now().timestamp())
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(payload,)| payload))
}

/// Store a payload (upsert) that expires after `ttl_secs`.
pub async fn set(
    pool: &SqlitePool,
    cache_key: &str,
    payload: &str,
    ttl_secs: i64,
) -> Result<(), sqlx::Error> {
    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        "INSERT INTO image_cache (cache_key, payload, created_ts, expires_ts) VALUES (?, ?, ?, ?) \
         ON CONFLICT(cache_key) DO UPDATE SET \
         payload = excluded.payload, \
         created_ts = excluded.created_ts, \
         expires_ts = excluded.expires_ts",
    )
    .bind(cache_key)
    .bind(payload)
    .bind(now)
    .bind(now + ttl_secs)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete expired rows. Returns the number of rows removed.
pub async fn purge_expired(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM image_cache WHERE expires_ts <= ?")
        .bind(chrono::Utc::now().timestamp())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
