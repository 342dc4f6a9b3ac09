//! Operation domain module

mod entity;
pub mod repository;

pub use entity::{Label, Operation, OperationId};
pub use repository::OperationRepository;

#[cfg(test)]
pub use repository::MockOperationRepository;
