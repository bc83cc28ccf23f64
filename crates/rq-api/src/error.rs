//! API error handling
//!
//! Provides HTTP error types with HAL+JSON responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rq_core::{RestError, ValidationErrorModel};
use serde::Serialize;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    UnprocessableEntity(Vec<ValidationErrorModel>),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RestError> for ApiError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::UnprocessableEntity(errors) => ApiError::UnprocessableEntity(errors),
            filter @ RestError::Filter { .. } => ApiError::BadRequest(filter.to_string()),
            other => {
                tracing::error!(error = %other, code = other.error_code(), "Query declaration error");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct HalError {
    #[serde(rename = "_type")]
    type_name: &'static str,
    #[serde(rename = "errorIdentifier")]
    error_identifier: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<ValidationErrorModel>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match self {
            ApiError::BadRequest(message) => HalError {
                type_name: "Error",
                error_identifier: "urn:rest-query:api:errors:InvalidQuery",
                message,
                errors: None,
            },
            ApiError::UnprocessableEntity(errors) => HalError {
                type_name: "Error",
                error_identifier: "urn:rest-query:api:errors:UnprocessableEntity",
                message: format!("{} validation error(s)", errors.len()),
                errors: Some(errors),
            },
            ApiError::Internal(message) => HalError {
                type_name: "Error",
                error_identifier: "urn:rest-query:api:errors:InternalError",
                message,
                errors: None,
            },
        };

        (status, Json(error)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rq_core::FilterError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_from_rest_error() {
        let err: ApiError = RestError::Filter {
            query_key: "page".into(),
            source: FilterError::new("\"x\" is not an integer"),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: ApiError = RestError::empty_argument("query_element").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = RestError::UnprocessableEntity(vec![]).into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unprocessable_entity_body_lists_errors_in_order() {
        let response = ApiError::UnprocessableEntity(vec![
            ValidationErrorModel::new("name", "is required"),
            ValidationErrorModel::new("price", "range"),
        ])
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["_type"], "Error");
        assert_eq!(
            body["errorIdentifier"],
            "urn:rest-query:api:errors:UnprocessableEntity"
        );
        assert_eq!(
            body["errors"],
            serde_json::json!([
                {"field": "name", "message": "is required"},
                {"field": "price", "message": "range"},
            ])
        );
    }

    #[tokio::test]
    async fn test_bad_request_body_has_no_errors_list() {
        let body = body_json(ApiError::bad_request("bad page").into_response()).await;
        assert_eq!(body["message"], "bad page");
        assert!(body.get("errors").is_none());
    }
}
