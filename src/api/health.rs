//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;

/// Service health plus the checks that produced it
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<HealthCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Outcome of probing one dependency
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

impl HealthCheck {
    fn from_result<T, E: std::fmt::Display>(
        name: &'static str,
        result: Result<T, E>,
        started: Instant,
    ) -> Self {
        let (status, message) = match result {
            Ok(_) => (HealthStatus::Healthy, None),
            Err(e) => (HealthStatus::Unhealthy, Some(e.to_string())),
        };

        Self {
            name,
            status,
            message,
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Liveness: 200 whenever the process can answer
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
        checks: Vec::new(),
        latency_ms: None,
    })
}

/// Readiness: 503 until the repository answers
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let checks = vec![check_operation_repository(&state).await];

    let status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    };

    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks,
        latency_ms: Some(started.elapsed().as_millis() as u64),
    };

    (status_code, Json(response))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_operation_repository(state: &AppState) -> HealthCheck {
    let started = Instant::now();
    let result = state.operation_repository.count().await;
    HealthCheck::from_result("operation_repository", result, started)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::headers::HeaderUtil;
    use crate::domain::operation::MockOperationRepository;
    use crate::domain::DomainError;
    use crate::infrastructure::operation::InMemoryOperationRepository;

    fn state_with(repository: Arc<dyn crate::domain::OperationRepository>) -> AppState {
        AppState::new(repository, HeaderUtil::new("operationsApp").unwrap())
    }

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_health_response_omits_empty_checks() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0",
            checks: Vec::new(),
            latency_ms: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"healthy","version":"1.0.0"}"#);
    }

    #[tokio::test]
    async fn test_ready_with_working_repository() {
        let state = state_with(Arc::new(InMemoryOperationRepository::new()));
        let response = ready_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_with_failing_repository() {
        let mut mock = MockOperationRepository::new();
        mock.expect_count()
            .returning(|| Err(DomainError::storage("pool timed out")));

        let check = check_operation_repository(&state_with(Arc::new(mock))).await;
        assert_eq!(check.status, HealthStatus::Unhealthy);
        assert_eq!(check.message.as_deref(), Some("operation store failure: pool timed out"));
    }

    #[tokio::test]
    async fn test_ready_returns_unavailable_on_failure() {
        let mut mock = MockOperationRepository::new();
        mock.expect_count()
            .returning(|| Err(DomainError::storage("down")));

        let response = ready_check(State(state_with(Arc::new(mock))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
