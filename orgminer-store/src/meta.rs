//! Key-value metadata store
//!
//! Small JSONB blob store keyed by string. Its one job: hold the
//! pending-state metadata record written at submission, so status queries
//! during the Pending window can report author/repository/dates before a
//! worker has picked the job up.

use orgminer_core::dto::PendingMeta;
use sqlx::PgPool;
use uuid::Uuid;

/// Set a metadata blob, overwriting any previous value for the key.
pub async fn set(pool: &PgPool, key: &str, value: &serde_json::Value) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO job_meta (key, value)
        VALUES ($1, $2)
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a metadata blob by key.
pub async fn get(pool: &PgPool, key: &str) -> Result<Option<serde_json::Value>, sqlx::Error> {
    let row: Option<(serde_json::Value,)> =
        sqlx::query_as("SELECT value FROM job_meta WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|(value,)| value))
}

/// Persist the pending-state record for a freshly submitted job.
pub async fn set_pending_meta(pool: &PgPool, meta: &PendingMeta) -> Result<(), sqlx::Error> {
    let value = serde_json::to_value(meta).unwrap();
    set(pool, &PendingMeta::store_key(meta.job_id), &value).await
}

/// Read back the pending-state record for a job, if one was written.
pub async fn get_pending_meta(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Option<PendingMeta>, sqlx::Error> {
    let value = get(pool, &PendingMeta::store_key(job_id)).await?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
