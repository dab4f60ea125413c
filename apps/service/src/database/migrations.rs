use anyhow::{Context, Result};
use sqlx::PgPool;

use super::identifier::TableName;

/// DDL for the results table.
///
/// `timestamp` is filled in by the database when the row is inserted.
pub fn create_table_sql(table: &TableName) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id SERIAL PRIMARY KEY,
            url TEXT NOT NULL,
            status INT NOT NULL,
            regex_match BOOLEAN,
            response_time DOUBLE PRECISION NOT NULL,
            page_content TEXT,
            timestamp TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        table.quoted()
    )
}

/// Create the results table if it does not exist yet. Safe to call on every start.
pub async fn ensure_schema(pool: &PgPool, table: &TableName) -> Result<()> {
    let ddl = create_table_sql(table);
    tracing::debug!("Ensuring results table with:\n{}", ddl);

    sqlx::query(&ddl)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create table {table}"))?;

    Ok(())
}
