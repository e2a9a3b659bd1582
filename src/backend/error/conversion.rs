/**
 * Error Conversion
 *
 * All backend errors implement `IntoResponse` from Axum, so handlers
 * return `Result<_, BackendError>` and the status code and body come out
 * of the error itself.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Node not found",
 *   "status": 404
 * }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("[Error] {}", self);
        } else {
            tracing::debug!("[Error] {} -> {}", status.as_u16(), self);
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

/// Fallback for unknown routes
pub async fn not_found_fallback() -> Response {
    BackendError::handler(StatusCode::NOT_FOUND, "404 Not Found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::StoreError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = BackendError::not_found("Poem").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Poem not found");
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_store_failure_hides_cause() {
        let response = BackendError::from(StoreError::unavailable("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Server Error");
    }
}
