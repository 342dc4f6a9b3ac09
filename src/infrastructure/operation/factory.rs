//! Repository factory for runtime storage selection

use std::sync::Arc;

use crate::domain::operation::OperationRepository;
use crate::domain::DomainError;

use super::in_memory_repository::InMemoryOperationRepository;
use super::postgres_repository::{PostgresConfig, PostgresOperationRepository, DEFAULT_TABLE_NAME};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Some(Self::InMemory),
            "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating operation repositories
#[derive(Debug)]
pub struct OperationRepositoryFactory;

impl OperationRepositoryFactory {
    /// Creates a repository based on the configuration
    pub async fn create(
        config: &StorageConfig,
    ) -> Result<Arc<dyn OperationRepository>, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(Arc::new(InMemoryOperationRepository::new())),
            StorageConfig::Postgres(pg_config) => {
                let repository: Arc<dyn OperationRepository> =
                    Self::create_postgres(pg_config).await?;
                Ok(repository)
            }
        }
    }

    /// Creates a PostgreSQL repository, making sure its table exists
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> Result<Arc<PostgresOperationRepository>, DomainError> {
        let repository = PostgresOperationRepository::connect(config, DEFAULT_TABLE_NAME).await?;
        repository.ensure_table().await?;
        Ok(Arc::new(repository))
    }
}
