//! REST resource for bank account operations

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::api::headers::failure_alert;
use crate::api::pagination::{page_request, pagination_headers, PaginationParams};
use crate::api::state::AppState;
use crate::api::types::{ApiError, ValidatedJson};
use crate::domain::{DomainError, Operation, OperationId};

pub const ENTITY_NAME: &str = "operation";
pub const BASE_PATH: &str = "/api/operations";

/// POST /api/operations - Create a new operation
pub async fn create_operation(
    State(state): State<AppState>,
    ValidatedJson(operation): ValidatedJson<Operation>,
) -> Result<Response, ApiError> {
    debug!(?operation, "REST request to save Operation");
    create(&state, operation).await
}

/// PUT /api/operations - Replace an existing operation
///
/// An operation without an id is created instead.
pub async fn update_operation(
    State(state): State<AppState>,
    ValidatedJson(operation): ValidatedJson<Operation>,
) -> Result<Response, ApiError> {
    debug!(?operation, "REST request to update Operation");

    let Some(id) = operation.id() else {
        return create(&state, operation).await;
    };

    let saved = state.operation_repository.save(operation).await?;
    let headers = state
        .headers
        .entity_update_alert(ENTITY_NAME, &id.to_string());

    Ok((StatusCode::OK, headers, Json(saved)).into_response())
}

/// GET /api/operations - List operations one page at a time
pub async fn list_operations(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    debug!(page = ?params.page, per_page = ?params.per_page, "REST request to get a page of Operations");

    let request = page_request(params.page, params.per_page)?;
    let page = state.operation_repository.find_all(request).await?;
    let headers = pagination_headers(&page, BASE_PATH, params.page, params.per_page);

    Ok((StatusCode::OK, headers, Json(page.into_content())).into_response())
}

/// GET /api/operations/{id} - Get a single operation with its labels
pub async fn get_operation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    debug!(id, "REST request to get Operation");

    let id = OperationId::from(id);

    match state
        .operation_repository
        .find_one_with_eager_relationships(id)
        .await?
    {
        Some(operation) => Ok((StatusCode::OK, Json(operation)).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// DELETE /api/operations/{id} - Delete an operation
pub async fn delete_operation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    debug!(id, "REST request to delete Operation");

    let id = OperationId::from(id);
    let removed = state.operation_repository.delete(id).await?;

    if !removed {
        debug!(%id, "Operation to delete did not exist");
    }

    let headers = state
        .headers
        .entity_deletion_alert(ENTITY_NAME, &id.to_string());

    Ok((StatusCode::OK, headers).into_response())
}

async fn create(state: &AppState, operation: Operation) -> Result<Response, ApiError> {
    if !operation.is_new() {
        return Ok((
            StatusCode::BAD_REQUEST,
            failure_alert("A new operation cannot already have an ID"),
        )
            .into_response());
    }

    let saved = state.operation_repository.save(operation).await?;
    let id = saved
        .id()
        .ok_or_else(|| DomainError::internal("Repository returned an operation without an id"))?;

    let location = format!("{}/{}", BASE_PATH, id);
    let headers = state
        .headers
        .entity_creation_alert(ENTITY_NAME, &id.to_string());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        headers,
        Json(saved),
    )
        .into_response())
}
