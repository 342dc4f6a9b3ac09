//! Infrastructure layer - Storage, logging and metrics

pub mod logging;
pub mod observability;
pub mod operation;
