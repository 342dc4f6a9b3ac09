//! Application configuration

mod app_config;

pub use app_config::{
    AlertsConfig, AppConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
    StorageSettings,
};
