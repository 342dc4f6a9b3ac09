//! Operations API
//!
//! REST resource for bank account operations with paginated listing and
//! alert headers, backed by an in-memory or PostgreSQL repository.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::{AppState, HeaderUtil};
use infrastructure::operation::OperationRepositoryFactory;
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = config.storage.to_storage_config()?;
    info!(backend = ?storage.storage_type(), "Initializing operation repository");

    let repository = OperationRepositoryFactory::create(&storage).await?;
    let headers = HeaderUtil::new(&config.alerts.application_name)?;

    Ok(AppState::new(repository, headers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_state_uses_in_memory_repository() {
        let state = create_app_state().await.unwrap();

        assert_eq!(state.operation_repository.count().await.unwrap(), 0);
        assert_eq!(state.headers.alert_header().as_str(), "x-operationsapp-alert");
    }

    #[tokio::test]
    async fn test_invalid_application_name_fails() {
        let mut config = AppConfig::default();
        config.alerts.application_name = "has spaces".to_string();

        assert!(create_app_state_with_config(&config).await.is_err());
    }
}
