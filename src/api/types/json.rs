//! JSON extractor that validates the body before the handler runs

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::error::{ApiErrorDetail, ApiErrorResponse, ApiErrorType};

/// Deserializes a JSON body and runs its `validator` rules
///
/// Both malformed JSON and failed field validation are rejected with
/// `400 Bad Request` and a JSON error body, so handlers only ever see
/// well-formed, valid input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// Rejection returned when the body cannot be decoded or is invalid
#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
    message: String,
    code: &'static str,
}

impl JsonRejection {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        let response = ApiErrorResponse {
            error: ApiErrorDetail {
                message: self.message,
                error_type: ApiErrorType::InvalidRequestError,
                code: Some(self.code.to_string()),
            },
        };

        (self.status, AxumJson(response)).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => value,
            Err(rejection) => {
                return Err(JsonRejection {
                    status: rejection_status(&rejection),
                    message: format_rejection_message(&rejection),
                    code: "json_parse_error",
                });
            }
        };

        value.validate().map_err(|errors| JsonRejection {
            status: StatusCode::BAD_REQUEST,
            message: format!("Validation failed: {}", errors),
            code: "validation_error",
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Body decoding problems are client errors; content-type problems keep axum's status
fn rejection_status(rejection: &axum::extract::rejection::JsonRejection) -> StatusCode {
    use axum::extract::rejection::JsonRejection::*;

    match rejection {
        JsonDataError(_) | JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
        other => other.status(),
    }
}

/// Format the rejection message to be more user-friendly
fn format_rejection_message(rejection: &axum::extract::rejection::JsonRejection) -> String {
    use axum::extract::rejection::JsonRejection::*;

    match rejection {
        JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        BytesRejection(err) => format!("Failed to read request body: {}", err.body_text()),
        _ => "Invalid JSON request".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 3))]
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let extracted = ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"rent"}"#), &())
            .await
            .unwrap();

        assert_eq!(extracted.0.name, "rent");
    }

    #[tokio::test]
    async fn test_validation_failure_is_bad_request() {
        let rejection = ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"ab"}"#), &())
            .await
            .unwrap_err();

        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
        assert!(rejection.message().contains("name"));
    }

    #[tokio::test]
    async fn test_wrong_type_is_bad_request() {
        let rejection = ValidatedJson::<Payload>::from_request(json_request(r#"{"name":42}"#), &())
            .await
            .unwrap_err();

        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
        assert!(rejection.message().starts_with("Invalid JSON data"));
    }

    #[tokio::test]
    async fn test_missing_content_type_keeps_axum_status() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"name":"rent"}"#))
            .unwrap();

        let rejection = ValidatedJson::<Payload>::from_request(request, &())
            .await
            .unwrap_err();

        assert_eq!(rejection.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_json_rejection_into_response() {
        let rejection = JsonRejection {
            status: StatusCode::BAD_REQUEST,
            message: "Test error".to_string(),
            code: "validation_error",
        };

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
