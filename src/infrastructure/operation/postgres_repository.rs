//! PostgreSQL operation repository with connection pooling

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::debug;

use crate::domain::operation::{Operation, OperationId, OperationRepository};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::DomainError;

/// Default table holding operations
pub const DEFAULT_TABLE_NAME: &str = "operations";

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/operations".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }
}

/// PostgreSQL implementation of OperationRepository
///
/// The `id` column is a BIGSERIAL and is the source of truth for operation
/// ids; the remaining fields live in a JSONB `data` column.
#[derive(Debug)]
pub struct PostgresOperationRepository {
    pool: PgPool,
    table_name: String,
}

impl PostgresOperationRepository {
    /// Creates a repository over an existing pool
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
        }
    }

    /// Creates a repository with its own connection pool
    pub async fn connect(
        config: &PostgresConfig,
        table_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool, table_name))
    }

    /// Ensures the operations table exists
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        Ok(())
    }

    /// Writes an operation under the id it carries and moves the id sequence
    /// past it, all in one transaction
    ///
    /// The table lock keeps generated inserts out until the sequence has
    /// caught up, so they can never be handed an id that is already taken.
    async fn upsert_with_id(&self, id: OperationId, data: serde_json::Value) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(&lock_sql(&self.table_name))
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to lock operations: {}", e)))?;

        sqlx::query(&upsert_sql(&self.table_name))
            .bind(id.value())
            .bind(data)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to save operation: {}", e)))?;

        let sequence: Option<String> = sqlx::query_scalar("SELECT pg_get_serial_sequence($1, 'id')")
            .bind(&self.table_name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find id sequence: {}", e)))?;
        let sequence = sequence.ok_or_else(|| {
            DomainError::storage(format!("Table {} has no id sequence", self.table_name))
        })?;

        let issued: i64 = sqlx::query_scalar(&issued_sql(&sequence))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read id sequence: {}", e)))?;

        if id.value() > issued {
            sqlx::query("SELECT setval($1::regclass, $2)")
                .bind(&sequence)
                .bind(id.value())
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to advance id sequence: {}", e)))?;
            debug!(sequence = %sequence, to = id.value(), "Advanced id sequence");
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit operation: {}", e)))
    }
}

/// Blocks generated inserts while leaving reads alone
fn lock_sql(table: &str) -> String {
    format!("LOCK TABLE {} IN SHARE ROW EXCLUSIVE MODE", table)
}

fn upsert_sql(table: &str) -> String {
    format!(
        r#"
        INSERT INTO {} (id, data)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE
        SET data = EXCLUDED.data, updated_at = NOW()
        "#,
        table
    )
}

/// Highest id the sequence has already handed out, zero for a fresh sequence
fn issued_sql(sequence: &str) -> String {
    format!(
        "SELECT CASE WHEN is_called THEN last_value ELSE last_value - 1 END FROM {}",
        sequence
    )
}

fn encode(operation: &Operation) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(operation)
        .map_err(|e| DomainError::storage(format!("Failed to serialize operation: {}", e)))
}

fn decode(row: &PgRow) -> Result<Operation, DomainError> {
    let raw_id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Failed to read operation id: {}", e)))?;
    let data: serde_json::Value = row
        .try_get("data")
        .map_err(|e| DomainError::storage(format!("Failed to read operation data: {}", e)))?;

    let mut operation: Operation = serde_json::from_value(data)
        .map_err(|e| DomainError::storage(format!("Failed to deserialize operation: {}", e)))?;
    operation.assign_id(OperationId::new(raw_id));

    Ok(operation)
}

#[async_trait]
impl OperationRepository for PostgresOperationRepository {
    async fn save(&self, mut operation: Operation) -> Result<Operation, DomainError> {
        match operation.id() {
            None => {
                let query = format!(
                    "INSERT INTO {} (data) VALUES ($1) RETURNING id",
                    self.table_name
                );

                let row = sqlx::query(&query)
                    .bind(encode(&operation)?)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| DomainError::storage(format!("Failed to insert operation: {}", e)))?;

                let raw_id: i64 = row.try_get("id").map_err(|e| {
                    DomainError::storage(format!("Failed to read generated id: {}", e))
                })?;
                operation.assign_id(OperationId::new(raw_id));
                debug!(id = raw_id, "Inserted operation");
            }
            Some(id) => {
                self.upsert_with_id(id, encode(&operation)?).await?;
                debug!(id = %id, "Upserted operation");
            }
        }

        Ok(operation)
    }

    async fn find_all(&self, request: PageRequest) -> Result<Page<Operation>, DomainError> {
        let query = format!(
            "SELECT id, data FROM {} ORDER BY id LIMIT $1 OFFSET $2",
            self.table_name
        );

        let rows = sqlx::query(&query)
            .bind(i64::from(request.size()))
            .bind(request.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list operations: {}", e)))?;

        let content = rows.iter().map(decode).collect::<Result<Vec<_>, _>>()?;
        let total = self.count().await?;

        Ok(Page::new(content, request, total))
    }

    async fn find_one_with_eager_relationships(
        &self,
        id: OperationId,
    ) -> Result<Option<Operation>, DomainError> {
        // Labels are embedded in the JSONB document, so one row carries them
        let query = format!("SELECT id, data FROM {} WHERE id = $1", self.table_name);

        let row = sqlx::query(&query)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get operation: {}", e)))?;

        row.as_ref().map(decode).transpose()
    }

    async fn delete(&self, id: OperationId) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE id = $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete operation: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let query = format!("SELECT COUNT(*) AS count FROM {}", self.table_name);

        let row = sqlx::query(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count operations: {}", e)))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| DomainError::storage(format!("Failed to read count: {}", e)))?;
        Ok(count.max(0) as u64)
    }
}
