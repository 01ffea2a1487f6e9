//! Schema bootstrap for the todo table
//!
//! Idempotent; safe to run on every start. Skip it (`--skip-migrations`)
//! when an external migration tool owns the schema.

use sqlx::PgPool;

use crate::ServerResult;

/// Run all todo migrations
pub async fn run(pool: &PgPool) -> ServerResult<()> {
    tracing::info!("Running todo migrations...");

    // The unique constraint is deferred to commit so a tail rewrite may pass
    // through transient duplicates.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todo (
            id SERIAL PRIMARY KEY,
            text TEXT NOT NULL,
            done BOOLEAN NOT NULL DEFAULT FALSE,
            "index" INTEGER NOT NULL CHECK ("index" >= 0),
            CONSTRAINT todo_index_key UNIQUE ("index") DEFERRABLE INITIALLY DEFERRED
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Todo migrations complete");
    Ok(())
}
