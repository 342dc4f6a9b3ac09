//! Application state shared by the handlers

use std::sync::Arc;

use crate::api::headers::HeaderUtil;
use crate::domain::operation::OperationRepository;

/// Application state, cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub operation_repository: Arc<dyn OperationRepository>,
    pub headers: HeaderUtil,
}

impl AppState {
    /// Create new application state with the provided repository
    pub fn new(operation_repository: Arc<dyn OperationRepository>, headers: HeaderUtil) -> Self {
        Self {
            operation_repository,
            headers,
        }
    }
}
