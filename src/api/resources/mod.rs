//! REST resources mounted under `/api`

pub mod operations;

use axum::{routing::get, Router};

use super::state::AppState;

/// Routes for every REST resource, relative to `/api`
pub fn create_resources_router() -> Router<AppState> {
    Router::new()
        .route(
            "/operations",
            get(operations::list_operations)
                .post(operations::create_operation)
                .put(operations::update_operation),
        )
        .route(
            "/operations/{id}",
            get(operations::get_operation).delete(operations::delete_operation),
        )
}
