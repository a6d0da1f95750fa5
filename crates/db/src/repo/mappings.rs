use sqlx::SqlitePool;

/// Cross-provider identifiers stored for one primary ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingRow {
    pub primary_id: String,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<String>,
    pub tvdb_id: Option<String>,
}

/// Insert or replace the mapping for a primary ID.
pub async fn upsert(pool: &SqlitePool, row: &MappingRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO id_mapping (primary_id, imdb_id, tmdb_id, tvdb_id, updated_ts) \
         VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT(primary_id) DO UPDATE SET \
         imdb_id = excluded.imdb_id, \
         tmdb_id = excluded.tmdb_id, \
         tvdb_id = excluded.tvdb_id, \
         updated_ts = excluded.updated_ts",
    )
    .bind(&row.primary_id)
    .bind(&row.imdb_id)
    .bind(&row.tmdb_id)
    .bind(&row.tvdb_id)
    .bind(chrono::Utc::now().timestamp())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get(pool: &SqlitePool, primary_id: &str) -> Result<Option<MappingRow>, sqlx::Error> {
    let row: Option<(String, Option<String>, Option<String>, Option<String>)> = sqlx::query_as(
        "SELECT primary_id, imdb_id, tmdb_id, tvdb_id FROM id_mapping WHERE primary_id = ?",
    )
    .bind(primary_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(primary_id, imdb_id, tmdb_id, tvdb_id)| MappingRow {
        primary_id,
        imdb_id,
        tmdb_id,
        tvdb_id,
    }))
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM id_mapping")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
