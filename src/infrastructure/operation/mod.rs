//! Operation infrastructure implementations

mod factory;
mod in_memory_repository;
mod postgres_repository;

pub use factory::{OperationRepositoryFactory, StorageConfig, StorageType};
pub use in_memory_repository::InMemoryOperationRepository;
pub use postgres_repository::{PostgresConfig, PostgresOperationRepository, DEFAULT_TABLE_NAME};
