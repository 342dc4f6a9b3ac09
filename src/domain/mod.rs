//! Domain layer - Core entities and persistence contracts

pub mod error;
pub mod operation;
pub mod pagination;

pub use error::DomainError;
pub use operation::{Label, Operation, OperationId, OperationRepository};
pub use pagination::{Page, PageRequest};
