use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Ensures the shared records table and its indexes exist. Idempotent.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS records (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            data JSONB NOT NULL DEFAULT '{}'::jsonb,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY (collection, id)
        )",
    )
    .execute(pool)
    .await?;

    // Equality filters go through JSONB containment; this covers the
    // userId/username/status lookups the services issue.
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS records_data_idx \
         ON records USING GIN (data jsonb_path_ops)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS records_created_idx \
         ON records (collection, created_at DESC)",
    )
    .execute(pool)
    .await?;

    info!("records schema ready");
    Ok(())
}
